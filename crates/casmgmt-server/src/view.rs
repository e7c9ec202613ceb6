use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::wire;

/// Model behind `manage.html`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManageView {
    pub default_service_url: String,
    pub status: u16,
}

impl ManageView {
    pub fn render(&self) -> String {
        let model = wire::to_string(self).unwrap_or_else(|_| "{}".to_string());
        let url = html_escape::encode_double_quoted_attribute(&self.default_service_url);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Services Management</title>
<script id="model" type="application/json">
{model}
</script>
</head>
<body>
<div id="manage" data-default-service-url="{url}" data-status="{status}">
<h1>Services Management</h1>
<table id="services"></table>
</div>
</body>
</html>
"#,
            model = html_escape::encode_script(&model),
            url = url,
            status = self.status,
        )
    }
}

impl IntoResponse for ManageView {
    fn into_response(self) -> Response {
        Html(self.render()).into_response()
    }
}
