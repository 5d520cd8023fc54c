use crate::domain::product::{Product, ProductPage};
use crate::domain::types::ProductId;
use crate::forms::products::{EditAction, EditProductForm};
use crate::repository::{CatalogReader, CatalogWriter};
use crate::services::editor::{EditorError, ProductEditor};
use crate::services::inflight::InFlightUpdates;

use super::{ServiceError, ServiceResult};

/// Identifiers arrive from the URL; anything that is not a catalog id is a
/// missing product.
fn parse_product_id(product_id: i32) -> ServiceResult<ProductId> {
    ProductId::new(product_id).map_err(|_| ServiceError::NotFound)
}

/// Core business logic for rendering the product grid.
///
/// Fetches the whole catalog as one page. Repository errors are converted
/// into `ServiceError` variants so that the HTTP route can remain a thin
/// wrapper.
pub async fn show_products<R>(repo: &R) -> ServiceResult<ProductPage>
where
    R: CatalogReader,
{
    match repo.list_products().await {
        Ok(page) => Ok(page),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(e.into())
        }
    }
}

/// Loads a single product for the detail page.
pub async fn show_product<R>(product_id: i32, repo: &R) -> ServiceResult<Product>
where
    R: CatalogReader,
{
    let product_id = parse_product_id(product_id)?;

    match repo.get_product(product_id).await {
        Ok(product) => Ok(product),
        Err(e) => {
            log::error!("Failed to get product {product_id}: {e}");
            Err(e.into())
        }
    }
}

/// Mounts the edit form: fetches the product and the categories concurrently
/// and waits for both before producing a draft.
pub async fn open_editor<R>(product_id: ProductId, repo: &R) -> ProductEditor
where
    R: CatalogReader,
{
    let (product, categories) =
        tokio::join!(repo.get_product(product_id), repo.list_categories());

    let mut editor = ProductEditor::new();
    if let Err(e) = editor.resolve(product, categories) {
        log::error!("Failed to resolve editor for product {product_id}: {e}");
    }
    editor
}

/// Validates the draft and sends it to the catalog.
///
/// Validation failures never reach the network. A second submit for a product
/// whose update is still outstanding is refused and the draft is kept.
pub async fn submit_editor<W>(
    editor: &mut ProductEditor,
    product_id: ProductId,
    repo: &W,
    in_flight: &InFlightUpdates,
) -> Result<(), EditorError>
where
    W: CatalogWriter,
{
    let update = editor.begin_submit()?;

    let Some(_guard) = in_flight.try_acquire(product_id) else {
        log::warn!("Rejected concurrent update of product {product_id}");
        return editor.complete_submit(Err(ServiceError::Conflict));
    };

    let result = match repo.update_product(product_id, &update).await {
        Ok(product) => {
            log::info!("Updated product {product_id}");
            Ok(product)
        }
        Err(e) => {
            log::error!("Failed to update product {product_id}: {e}");
            Err(e.into())
        }
    };
    editor.complete_submit(result)
}

/// Applies one posted interaction of the edit form.
///
/// The browser posts the complete draft every time, so the editor is rebuilt
/// from the form before the requested action runs. Cancel closes the editor
/// without touching the catalog.
pub async fn apply_edit<R>(
    product_id: i32,
    form: EditProductForm,
    repo: &R,
    in_flight: &InFlightUpdates,
) -> ServiceResult<ProductEditor>
where
    R: CatalogReader + CatalogWriter,
{
    let product_id = parse_product_id(product_id)?;
    let validated = form.validated();
    let (draft, action) = form.into_draft(product_id);

    if action == EditAction::Cancel {
        let mut editor = ProductEditor::restore(draft, vec![]);
        editor.cancel();
        return Ok(editor);
    }

    let categories = match repo.list_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            return Ok(ProductEditor::failed(ServiceError::from(e).to_string()));
        }
    };

    let mut editor = ProductEditor::restore(draft, categories);
    if validated {
        if let Err(e) = editor.revalidate() {
            log::warn!("Draft of product {product_id} not revalidated: {e}");
        }
    }

    let outcome = match action {
        EditAction::AddReview => editor.add_review(),
        EditAction::RemoveReview(index) => editor.remove_review(index),
        EditAction::Submit => submit_editor(&mut editor, product_id, repo, in_flight).await,
        EditAction::Cancel | EditAction::Refresh => Ok(()),
    };

    match outcome {
        Ok(()) | Err(EditorError::Validation(_)) => {}
        Err(e) => log::warn!("Edit of product {product_id} ignored: {e}"),
    }

    Ok(editor)
}
