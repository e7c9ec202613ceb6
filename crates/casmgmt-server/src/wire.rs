//! JSON output in the layout the management UI expects: pretty printed,
//! with a space on both sides of every key/value colon (`"status" : 200`).

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

/// Pretty formatter that writes `" : "` between keys and values.
#[derive(Debug, Default)]
pub struct SpacedColonFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> SpacedColonFormatter<'a> {
    pub fn new() -> Self {
        Self { inner: PrettyFormatter::new() }
    }
}

impl Formatter for SpacedColonFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b" : ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }
}

pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut buf, SpacedColonFormatter::new());
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn writes_spaced_colons() {
        let out = to_string(&json!({ "status": 200 })).unwrap();
        assert_eq!(out, "{\n  \"status\" : 200\n}");
    }

    #[test]
    fn nests_arrays_and_objects() {
        let out = to_string(&json!({ "services": [{ "id": 1 }], "status": 200 })).unwrap();
        assert!(out.contains("\"services\" : ["));
        assert!(out.contains("\"id\" : 1"));
        assert!(out.contains("\"status\" : 200"));
    }

    #[test]
    fn empty_containers_stay_compact() {
        let out = to_string(&json!({ "services": [] })).unwrap();
        assert!(out.contains("\"services\" : []"));
    }
}
