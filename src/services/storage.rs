// src/services/storage.rs

use reqwest::header::CONTENT_TYPE;

use crate::common::error::AppError;

// Credenciais do Storage (Supabase). Ambas são necessárias.
#[derive(Clone)]
struct StorageCredentials {
    base_url: String,
    service_key: String,
}

/// Cliente de upload para o Storage do Supabase (REST)
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    credentials: Option<StorageCredentials>,
}

impl StorageClient {
    pub fn new(client: reqwest::Client, base_url: Option<String>, service_key: Option<String>) -> Self {
        let credentials = match (base_url, service_key) {
            (Some(base_url), Some(service_key)) if !base_url.is_empty() && !service_key.is_empty() => {
                Some(StorageCredentials {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    service_key,
                })
            }
            _ => None,
        };

        Self { client, credentials }
    }

    fn credentials(&self) -> Result<&StorageCredentials, AppError> {
        self.credentials.as_ref().ok_or_else(|| {
            AppError::ServiceUnavailable(
                "Storage não configurado: defina SUPABASE_URL e SUPABASE_SERVICE_ROLE_KEY.".into(),
            )
        })
    }

    /// Envia o arquivo e devolve o caminho gravado no bucket.
    /// Sem retry: a falha do provedor volta como `Upstream` com status e corpo originais.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let credentials = self.credentials()?;

        let response = self
            .client
            .post(format!("{}/storage/v1/object/{}/{}", credentials.base_url, bucket, path))
            .bearer_auth(&credentials.service_key)
            .header("apikey", &credentials.service_key)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Upload para {}/{} falhou com status {}", bucket, path, status);
            return Err(AppError::Upstream { status: status.as_u16(), message });
        }

        Ok(path.to_string())
    }

    /// URL pública do objeto. Passo separado do upload.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<String, AppError> {
        let credentials = self.credentials()?;
        let url = reqwest::Url::parse(&format!(
            "{}/storage/v1/object/public/{}/{}",
            credentials.base_url, bucket, path
        ))
        .map_err(|e| anyhow::anyhow!("URL pública inválida: {}", e))?;

        Ok(url.to_string())
    }
}

/// Formatos de foto aceitos. SVG fica de fora: é servido como documento e pode carregar script.
pub const ALLOWED_PHOTO_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

// "image/jpeg; charset=binary" -> "image/jpeg"
fn mime_essence(content_type: &str) -> String {
    content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

pub fn is_allowed_photo_type(content_type: &str) -> bool {
    ALLOWED_PHOTO_TYPES.contains(&mime_essence(content_type).as_str())
}

fn content_type_extension(content_type: &str) -> &'static str {
    match mime_essence(content_type).as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

/// Extensão a partir do nome original, se for de imagem aceita; senão vem do content-type
pub fn file_extension(file_name: Option<&str>, content_type: &str) -> String {
    let from_name = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| matches!(ext.as_str(), "jpg" | "jpeg" | "png" | "webp" | "gif"));

    from_name.unwrap_or_else(|| content_type_extension(content_type).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_without_credentials_fails_before_network() {
        let storage = StorageClient::new(reqwest::Client::new(), None, Some("chave".into()));

        let result = storage.upload("pets", "a/b.png", vec![1, 2, 3], "image/png").await;

        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
        assert!(storage.public_url("pets", "a/b.png").is_err());
    }

    #[test]
    fn public_url_points_to_public_object() {
        let storage = StorageClient::new(
            reqwest::Client::new(),
            Some("https://projeto.supabase.co/".into()),
            Some("chave".into()),
        );

        let url = storage.public_url("pets", "123/foto.jpg").unwrap();

        assert_eq!(url, "https://projeto.supabase.co/storage/v1/object/public/pets/123/foto.jpg");
    }

    #[test]
    fn extension_prefers_file_name_then_content_type() {
        assert_eq!(file_extension(Some("Thor.JPG"), "image/png"), "jpg");
        assert_eq!(file_extension(Some("sem-extensao"), "image/png"), "png");
        assert_eq!(file_extension(None, "application/octet-stream"), "bin");
    }

    #[test]
    fn svg_name_does_not_leak_into_stored_path() {
        assert_eq!(file_extension(Some("gato.svg"), "image/png"), "png");
        assert_eq!(file_extension(Some("x.html"), "image/gif"), "gif");
    }

    #[test]
    fn only_raster_photo_types_are_allowed() {
        for ok in ["image/jpeg", "image/png", "image/webp", "image/gif", "IMAGE/PNG", "image/jpeg; charset=binary"] {
            assert!(is_allowed_photo_type(ok), "{ok} deveria ser aceito");
        }
        for rejected in ["image/svg+xml", "image/svg", "text/html", "image/", "application/octet-stream", ""] {
            assert!(!is_allowed_photo_type(rejected), "{rejected} deveria ser rejeitado");
        }
    }
}
