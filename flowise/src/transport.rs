use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use shared::{ClientTransport, FormData, FormPart, Method, OutgoingBody, OutgoingRequest, RawResponse};
use tracing::warn;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Clone)]
pub struct ReqwestTransport(pub reqwest::Client);

/// Mime types reqwest cannot parse are sent as `application/octet-stream`.
fn file_mime(mime: &str) -> &str {
    if Part::text("").mime_str(mime).is_ok() {
        mime
    } else {
        warn!(mime, "invalid mime type for upload, sending as {FALLBACK_MIME}");
        FALLBACK_MIME
    }
}

fn multipart(form: FormData) -> Result<Form, reqwest::Error> {
    form.into_parts()
        .into_iter()
        .try_fold(Form::new(), |form, (name, part)| match part {
            FormPart::Text(value) => Ok(form.text(name, value)),
            FormPart::File {
                file_name,
                mime,
                bytes,
            } => {
                let part = Part::bytes(bytes).file_name(file_name).mime_str(file_mime(&mime))?;
                Ok(form.part(name, part))
            }
        })
}

#[async_trait(?Send)]
impl ClientTransport for ReqwestTransport {
    type Error = reqwest::Error;

    async fn send_request(&self, request: OutgoingRequest) -> Result<RawResponse, Self::Error> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self.0.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // reqwest writes the multipart boundary header itself
        let builder = match request.body {
            OutgoingBody::Empty => builder,
            OutgoingBody::Json(json) => builder.body(json),
            OutgoingBody::Form(form) => builder.multipart(multipart(form)?),
        };

        let resp = builder.send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}
