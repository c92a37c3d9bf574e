//! services/api/src/web/catalog.rs
//!
//! Catalog endpoints: list, create, update, and remove products. Create and
//! update accept multipart forms carrying a cover image and the pdf itself;
//! files are placed in the content store before the database row is written,
//! so a storage failure never leaves a partial row behind.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pdf_shala_core::domain::Product;
use pdf_shala_core::ports::PortError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::AppState;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub title: String,
    pub price: f64,
    pub image: String,
    pub pdf: String,
    pub rating: f64,
    pub reviews: i32,
    pub downloads: i32,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            title: p.title,
            price: p.price,
            image: p.image,
            pdf: p.pdf,
            rating: p.rating,
            reviews: p.reviews,
            downloads: p.downloads,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CreateProductResponse {
    pub message: String,
    pub product: ProductResponse,
}

/// An uploaded file part: original filename plus its bytes.
struct UploadedFile {
    original_name: String,
    bytes: Vec<u8>,
}

/// The fields of the product multipart form. Both files are optional at the
/// parsing layer; each handler enforces its own requirements.
#[derive(Default)]
struct ProductForm {
    title: Option<String>,
    price: Option<f64>,
    image: Option<UploadedFile>,
    pdf: Option<UploadedFile>,
}

/// Reads the multipart stream into a `ProductForm`, rejecting files with the
/// wrong content type (image/* for the cover, application/pdf for the pdf).
async fn read_product_form(
    mut multipart: Multipart,
) -> Result<ProductForm, (StatusCode, String)> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                let text = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Invalid title field: {}", e))
                })?;
                form.title = Some(text);
            }
            "price" => {
                let text = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Invalid price field: {}", e))
                })?;
                let price = text.trim().parse::<f64>().map_err(|_| {
                    (
                        StatusCode::BAD_REQUEST,
                        format!("'{}' is not a valid price", text),
                    )
                })?;
                form.price = Some(price);
            }
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("image/") {
                    return Err((StatusCode::BAD_REQUEST, "Invalid file type".to_string()));
                }
                let original_name = field.file_name().unwrap_or("image").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to read file bytes: {}", e),
                    )
                })?;
                form.image = Some(UploadedFile {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            "pdf" => {
                let content_type = field.content_type().unwrap_or_default();
                if content_type != "application/pdf" {
                    return Err((StatusCode::BAD_REQUEST, "Invalid file type".to_string()));
                }
                let original_name = field.file_name().unwrap_or("document.pdf").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to read file bytes: {}", e),
                    )
                })?;
                form.pdf = Some(UploadedFile {
                    original_name,
                    bytes: bytes.to_vec(),
                });
            }
            // Unknown fields are ignored.
            _ => {}
        }
    }

    Ok(form)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// GET /pdf/get-pdfs - List the full catalog (no pagination).
#[utoipa::path(
    get,
    path = "/pdf/get-pdfs",
    responses(
        (status = 200, description = "The full product collection", body = [ProductResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_products_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let products = state.db.list_products().await.map_err(|e| {
        error!("Failed to list products: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to list products".to_string(),
        )
    })?;

    let response: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok((StatusCode::OK, Json(response)))
}

/// POST /pdf/add-products - Create a product from a multipart form.
///
/// Both the cover image and the pdf are required. Files are stored first;
/// the database row is written only after both placements succeed.
#[utoipa::path(
    post,
    path = "/pdf/add-products",
    request_body(content_type = "multipart/form-data", description = "title, price, image, pdf"),
    responses(
        (status = 201, description = "Product created", body = CreateProductResponse),
        (status = 400, description = "Missing file or invalid field"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn add_product_handler(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let form = read_product_form(multipart).await?;

    let (image, pdf) = match (form.image, form.pdf) {
        (Some(image), Some(pdf)) => (image, pdf),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Both PDF and image are required.".to_string(),
            ))
        }
    };
    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "title is required".to_string()))?;
    let price = form
        .price
        .ok_or((StatusCode::BAD_REQUEST, "price is required".to_string()))?;

    let stored_image = state
        .files
        .save(&image.original_name, &image.bytes)
        .await
        .map_err(|e| {
            error!("Failed to store image: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store image".to_string(),
            )
        })?;

    let stored_pdf = match state.files.save(&pdf.original_name, &pdf.bytes).await {
        Ok(name) => name,
        Err(e) => {
            error!("Failed to store pdf: {:?}", e);
            // Do not leave the already-placed image orphaned.
            if let Err(cleanup) = state.files.remove(&stored_image).await {
                warn!("Failed to clean up {}: {:?}", stored_image, cleanup);
            }
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to store pdf".to_string(),
            ));
        }
    };

    let product = state
        .db
        .create_product(&title, price, &stored_image, &stored_pdf)
        .await
        .map_err(|e| {
            error!("Failed to create product: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create product".to_string(),
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product added successfully".to_string(),
            product: product.into(),
        }),
    ))
}

/// PUT /pdf/update-product/{id} - Update a product; files are optional.
///
/// A provided file replaces the stored one (the old file is deleted after the
/// row update); an omitted file leaves the existing reference untouched.
#[utoipa::path(
    put,
    path = "/pdf/update-product/{id}",
    request_body(content_type = "multipart/form-data", description = "title, price, image?, pdf?"),
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 404, description = "No product with that id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The product id.")
    )
)]
pub async fn update_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let existing = state.db.get_product(id).await.map_err(|e| match e {
        PortError::NotFound(_) => {
            (StatusCode::NOT_FOUND, "Product not found".to_string())
        }
        other => {
            error!("Failed to fetch product: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch product".to_string(),
            )
        }
    })?;

    let form = read_product_form(multipart).await?;
    let title = form.title.unwrap_or_else(|| existing.title.clone());
    let price = form.price.unwrap_or(existing.price);

    // Store replacements before touching the row.
    let new_image = match &form.image {
        Some(file) => Some(
            state
                .files
                .save(&file.original_name, &file.bytes)
                .await
                .map_err(|e| {
                    error!("Failed to store image: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to store image".to_string(),
                    )
                })?,
        ),
        None => None,
    };
    let new_pdf = match &form.pdf {
        Some(file) => Some(
            state
                .files
                .save(&file.original_name, &file.bytes)
                .await
                .map_err(|e| {
                    error!("Failed to store pdf: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to store pdf".to_string(),
                    )
                })?,
        ),
        None => None,
    };

    let image = new_image.clone().unwrap_or_else(|| existing.image.clone());
    let pdf = new_pdf.clone().unwrap_or_else(|| existing.pdf.clone());

    let updated = match state
        .db
        .update_product(id, &title, price, &image, &pdf)
        .await
    {
        Ok(product) => product,
        Err(e) => {
            error!("Failed to update product: {:?}", e);
            // A replacement already placed in the store must not be orphaned
            // by a failed row update.
            for stored in new_image.iter().chain(new_pdf.iter()) {
                if let Err(cleanup) = state.files.remove(stored).await {
                    warn!("Failed to clean up {}: {:?}", stored, cleanup);
                }
            }
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update product".to_string(),
            ));
        }
    };

    // Replaced files are removed only after the row update succeeded. The
    // database is the source of truth; cleanup failures are logged, not raised.
    if new_image.is_some() {
        if let Err(e) = state.files.remove(&existing.image).await {
            warn!("Failed to remove old image {}: {:?}", existing.image, e);
        }
    }
    if new_pdf.is_some() {
        if let Err(e) = state.files.remove(&existing.pdf).await {
            warn!("Failed to remove old pdf {}: {:?}", existing.pdf, e);
        }
    }

    Ok((StatusCode::OK, Json(ProductResponse::from(updated))))
}

/// GET /pdf/remove-product/{id} - Delete a product and its backing files.
///
/// The row deletion is authoritative; file removal is best-effort and a
/// failure there is logged, never surfaced. A second delete of the same id
/// reports not-found without an unhandled error.
#[utoipa::path(
    get,
    path = "/pdf/remove-product/{id}",
    responses(
        (status = 200, description = "Confirmation text"),
        (status = 404, description = "No product with that id"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The product id.")
    )
)]
pub async fn remove_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let deleted = state.db.delete_product(id).await.map_err(|e| match e {
        PortError::NotFound(_) => {
            (StatusCode::NOT_FOUND, "Product not found".to_string())
        }
        other => {
            error!("Failed to delete product: {:?}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete product".to_string(),
            )
        }
    })?;

    for stored in [&deleted.image, &deleted.pdf] {
        if let Err(e) = state.files.remove(stored).await {
            warn!("Failed to remove {}: {:?}", stored, e);
        }
    }

    Ok((StatusCode::OK, "Product removed successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use pdf_shala_core::domain::{
        Customer, NewUser, PaymentOrder, PaymentSession, User, UserCredentials,
    };
    use pdf_shala_core::ports::{DatabaseService, FileStore, PaymentGateway, PortResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// A scripted catalog database holding its products in memory.
    struct ScriptedDb {
        products: Mutex<Vec<Product>>,
        create_calls: AtomicUsize,
        update_fails: bool,
    }

    impl ScriptedDb {
        fn with_products(products: Vec<Product>) -> Self {
            Self {
                products: Mutex::new(products),
                create_calls: AtomicUsize::new(0),
                update_fails: false,
            }
        }
    }

    #[async_trait]
    impl DatabaseService for ScriptedDb {
        async fn create_user(
            &self,
            _new_user: NewUser,
            _password_hash: &str,
        ) -> PortResult<User> {
            Err(PortError::Unexpected("not wired in this test".to_string()))
        }

        async fn get_user_by_email(&self, _email: &str) -> PortResult<UserCredentials> {
            Err(PortError::Unexpected("not wired in this test".to_string()))
        }

        async fn list_products(&self) -> PortResult<Vec<Product>> {
            Ok(self.products.lock().unwrap().clone())
        }

        async fn get_product(&self, id: Uuid) -> PortResult<Product> {
            self.products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))
        }

        async fn create_product(
            &self,
            title: &str,
            price: f64,
            image: &str,
            pdf: &str,
        ) -> PortResult<Product> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            let product = Product {
                id: Uuid::new_v4(),
                title: title.to_string(),
                price,
                image: image.to_string(),
                pdf: pdf.to_string(),
                rating: 0.0,
                reviews: 0,
                downloads: 0,
            };
            self.products.lock().unwrap().push(product.clone());
            Ok(product)
        }

        async fn update_product(
            &self,
            id: Uuid,
            title: &str,
            price: f64,
            image: &str,
            pdf: &str,
        ) -> PortResult<Product> {
            if self.update_fails {
                return Err(PortError::Unexpected("row update refused".to_string()));
            }
            let mut products = self.products.lock().unwrap();
            let product = products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?;
            product.title = title.to_string();
            product.price = price;
            product.image = image.to_string();
            product.pdf = pdf.to_string();
            Ok(product.clone())
        }

        async fn delete_product(&self, id: Uuid) -> PortResult<Product> {
            let mut products = self.products.lock().unwrap();
            let pos = products
                .iter()
                .position(|p| p.id == id)
                .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?;
            Ok(products.remove(pos))
        }
    }

    /// A content store that records placements and removals instead of
    /// touching the filesystem.
    #[derive(Default)]
    struct ScriptedFiles {
        saves: Mutex<Vec<String>>,
        removes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileStore for ScriptedFiles {
        async fn save(&self, original_name: &str, _bytes: &[u8]) -> PortResult<String> {
            let stored = format!("stored-{}", original_name);
            self.saves.lock().unwrap().push(stored.clone());
            Ok(stored)
        }

        async fn remove(&self, stored_name: &str) -> PortResult<()> {
            self.removes.lock().unwrap().push(stored_name.to_string());
            Ok(())
        }
    }

    struct IdleGateway;

    #[async_trait]
    impl PaymentGateway for IdleGateway {
        async fn create_order(
            &self,
            _order_id: &str,
            _amount: f64,
            _customer: &Customer,
        ) -> PortResult<PaymentSession> {
            Err(PortError::PaymentInit("not wired in this test".to_string()))
        }

        async fn fetch_order(&self, _order_id: &str) -> PortResult<PaymentOrder> {
            Err(PortError::PaymentVerification(
                "not wired in this test".to_string(),
            ))
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://localhost/unused".to_string(),
            log_level: tracing::Level::INFO,
            uploads_dir: std::env::temp_dir(),
            jwt_secret: "test-secret".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            cashfree_base_url: "http://localhost:0".to_string(),
            cashfree_app_id: "app".to_string(),
            cashfree_secret_key: "key".to_string(),
        }
    }

    fn make_state(db: Arc<ScriptedDb>, files: Arc<ScriptedFiles>) -> Arc<AppState> {
        Arc::new(AppState {
            db,
            files,
            gateway: Arc::new(IdleGateway),
            config: Arc::new(test_config()),
        })
    }

    fn product(image: &str, pdf: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            title: "JavaScript Essentials".to_string(),
            price: 399.0,
            image: image.to_string(),
            pdf: pdf.to_string(),
            rating: 0.0,
            reviews: 0,
            downloads: 0,
        }
    }

    const BOUNDARY: &str = "XBOUNDARY";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        )
    }

    fn file_part(name: &str, filename: &str, content_type: &str, data: &str) -> String {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n{}\r\n",
            BOUNDARY, name, filename, content_type, data
        )
    }

    async fn multipart_of(parts: Vec<String>) -> Multipart {
        let body = format!("{}--{}--\r\n", parts.concat(), BOUNDARY);
        let request = Request::builder()
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    #[tokio::test]
    async fn add_without_pdf_is_rejected_before_any_write() {
        let db = Arc::new(ScriptedDb::with_products(vec![]));
        let files = Arc::new(ScriptedFiles::default());
        let state = make_state(db.clone(), files.clone());

        let multipart = multipart_of(vec![
            text_part("title", "React in Depth PDF"),
            text_part("price", "499"),
            file_part("image", "react-in-depth.png", "image/png", "png-bytes"),
        ])
        .await;

        let err = add_product_handler(State(state), multipart)
            .await
            .err()
            .unwrap();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(db.create_calls.load(Ordering::SeqCst), 0);
        assert!(files.saves.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_with_both_files_stores_them_and_writes_the_row() {
        let db = Arc::new(ScriptedDb::with_products(vec![]));
        let files = Arc::new(ScriptedFiles::default());
        let state = make_state(db.clone(), files.clone());

        let multipart = multipart_of(vec![
            text_part("title", "React in Depth PDF"),
            text_part("price", "499"),
            file_part("image", "react-in-depth.png", "image/png", "png-bytes"),
            file_part("pdf", "react-in-depth.pdf", "application/pdf", "pdf-bytes"),
        ])
        .await;

        let response = add_product_handler(State(state), multipart).await;

        assert!(response.is_ok());
        assert_eq!(db.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(files.saves.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_delete_reports_not_found() {
        let existing = product("js.png", "js.pdf");
        let id = existing.id;
        let db = Arc::new(ScriptedDb::with_products(vec![existing]));
        let files = Arc::new(ScriptedFiles::default());
        let state = make_state(db, files.clone());

        let first = remove_product_handler(State(state.clone()), Path(id)).await;
        assert!(first.is_ok());
        // The row deletion carried both backing files with it.
        assert_eq!(
            files.removes.lock().unwrap().as_slice(),
            ["js.png", "js.pdf"]
        );

        let err = remove_product_handler(State(state), Path(id))
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_row_update_cleans_up_replacement_files() {
        let existing = product("old.png", "old.pdf");
        let id = existing.id;
        let mut db = ScriptedDb::with_products(vec![existing]);
        db.update_fails = true;
        let db = Arc::new(db);
        let files = Arc::new(ScriptedFiles::default());
        let state = make_state(db, files.clone());

        let multipart = multipart_of(vec![file_part(
            "image",
            "new-cover.png",
            "image/png",
            "png-bytes",
        )])
        .await;

        let err = update_product_handler(State(state), Path(id), multipart)
            .await
            .err()
            .unwrap();

        assert_eq!(err.0, StatusCode::INTERNAL_SERVER_ERROR);
        // The freshly placed replacement was removed; the files the row
        // still references were left alone.
        assert_eq!(
            files.removes.lock().unwrap().as_slice(),
            ["stored-new-cover.png"]
        );
    }

    #[tokio::test]
    async fn successful_update_replaces_and_removes_the_old_files() {
        let existing = product("old.png", "old.pdf");
        let id = existing.id;
        let db = Arc::new(ScriptedDb::with_products(vec![existing]));
        let files = Arc::new(ScriptedFiles::default());
        let state = make_state(db.clone(), files.clone());

        let multipart = multipart_of(vec![
            text_part("price", "299"),
            file_part("image", "new-cover.png", "image/png", "png-bytes"),
        ])
        .await;

        let response = update_product_handler(State(state), Path(id), multipart).await;

        assert!(response.is_ok());
        let updated = db.get_product(id).await.unwrap();
        assert_eq!(updated.price, 299.0);
        assert_eq!(updated.image, "stored-new-cover.png");
        // Only the replaced image was cleaned up; the pdf stayed.
        assert_eq!(files.removes.lock().unwrap().as_slice(), ["old.png"]);
    }
}
