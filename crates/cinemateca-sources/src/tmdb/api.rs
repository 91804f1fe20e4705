use cinemateca_models::MediaKind;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::SourceError;
use crate::traits::SubResource;

/// Per-request settings shared by every catalog endpoint
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    pub base_url: &'a str,
    pub api_key: Option<&'a str>,
    pub language: &'a str,
}

/// GET /{kind}/{id}
pub fn detail_path(kind: MediaKind, id: &str) -> String {
    format!("/{}/{}", kind.as_str(), urlencoding::encode(id.trim()))
}

/// GET /{kind}/{id}/{credits|videos|watch/providers|images}
pub fn sub_resource_path(kind: MediaKind, id: &str, resource: SubResource) -> String {
    format!("{}/{}", detail_path(kind, id), resource.path())
}

/// GET /genre/{kind}/list
pub fn genre_list_path(kind: MediaKind) -> String {
    format!("/genre/{}/list", kind.as_str())
}

/// Query string for a request. Images are asked for in the configured
/// language plus language-neutral artwork.
pub fn query_params(ctx: &RequestContext<'_>, resource: Option<SubResource>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(api_key) = ctx.api_key {
        params.push(("api_key", api_key.to_string()));
    }
    params.push(("language", ctx.language.to_string()));

    if resource == Some(SubResource::Images) {
        let lang = ctx.language.split('-').next().unwrap_or(ctx.language);
        params.push(("include_image_language", format!("{},null", lang)));
    }

    params
}

/// Issue a GET and decode the body as JSON.
///
/// 404 maps to `SourceError::NotFound`, other non-success statuses to
/// `SourceError::Status`, transport timeouts to `SourceError::Timeout`.
pub async fn get_json(
    client: &Client,
    ctx: &RequestContext<'_>,
    path: &str,
    resource: Option<SubResource>,
) -> Result<Value, SourceError> {
    let url = format!("{}{}", ctx.base_url.trim_end_matches('/'), path);
    debug!(url = %url, "Catalog request");

    let response = client
        .get(&url)
        .query(&query_params(ctx, resource))
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(SourceError::NotFound);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    trace!(url = %url, bytes = body.len(), "Catalog response");
    let value: Value = serde_json::from_str(&body)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(api_key: Option<&'a str>) -> RequestContext<'a> {
        RequestContext {
            base_url: "https://api.themoviedb.org/3",
            api_key,
            language: "es-ES",
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(detail_path(MediaKind::Movie, "550"), "/movie/550");
        assert_eq!(
            sub_resource_path(MediaKind::Tv, "1399", SubResource::WatchProviders),
            "/tv/1399/watch/providers"
        );
        assert_eq!(genre_list_path(MediaKind::Tv), "/genre/tv/list");
    }

    #[test]
    fn test_id_is_encoded() {
        assert_eq!(detail_path(MediaKind::Movie, "../account"), "/movie/..%2Faccount");
    }

    #[test]
    fn test_query_params() {
        let params = query_params(&ctx(Some("k")), None);
        assert_eq!(
            params,
            vec![("api_key", "k".to_string()), ("language", "es-ES".to_string())]
        );

        let params = query_params(&ctx(None), Some(SubResource::Images));
        assert_eq!(
            params,
            vec![
                ("language", "es-ES".to_string()),
                ("include_image_language", "es,null".to_string()),
            ]
        );
    }
}
