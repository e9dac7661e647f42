//! Stamps overlay pages onto the PDF template.
//!
//! The template's own content is wrapped in `q`/`Q` so any graphics state it
//! leaves behind cannot leak into the overlay drawn after it.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::content::encode_page;
use super::fonts::FontSet;
use super::layout::OverlayPage;
use super::DocumentError;

const MAX_PAGE_TREE_DEPTH: usize = 32;

fn pdf_error(e: lopdf::Error) -> DocumentError {
    DocumentError::Pdf(e.to_string())
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Dictionary, DocumentError> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).map_err(pdf_error),
        other => other.as_dict().map_err(pdf_error),
    }
}

/// Resources of a page, following `/Parent` links for inherited ones.
fn page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary, DocumentError> {
    let mut current = Some(page_id);
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        let Some(id) = current else { break };
        let node = doc.get_dictionary(id).map_err(pdf_error)?;
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(resolve_dict(doc, resources)?.clone());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(Dictionary::new())
}

fn page_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>, DocumentError> {
    let page = doc.get_dictionary(page_id).map_err(pdf_error)?;
    let contents = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id).map_err(pdf_error)? {
            Object::Array(items) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(_) | Err(_) => Vec::new(),
    };
    Ok(contents)
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: &OverlayPage,
    fonts: &FontSet,
    font_ids: (ObjectId, ObjectId),
) -> Result<(), DocumentError> {
    let mut resources = page_resources(doc, page_id)?;
    let mut font_dict = match resources.get(b"Font") {
        Ok(existing) => resolve_dict(doc, existing)?.clone(),
        Err(_) => Dictionary::new(),
    };
    font_dict.set(fonts.regular.resource_name(), Object::Reference(font_ids.0));
    font_dict.set(fonts.bold.resource_name(), Object::Reference(font_ids.1));
    resources.set("Font", Object::Dictionary(font_dict));

    let original = page_contents(doc, page_id)?;
    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec()));
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), encode_page(overlay, fonts)));

    let mut contents = Vec::with_capacity(original.len() + 3);
    contents.push(Object::Reference(save_id));
    contents.extend(original);
    contents.push(Object::Reference(restore_id));
    contents.push(Object::Reference(overlay_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(pdf_error)?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

/// Stamp `overlays[i]` onto page `i` of `template`. Pages without an overlay
/// are left as they are.
pub fn stamp_pages(
    template: &[u8],
    overlays: &[OverlayPage],
    fonts: &FontSet,
) -> Result<Vec<u8>, DocumentError> {
    let mut doc = Document::load_mem(template).map_err(|e| DocumentError::Template(e.to_string()))?;
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    if pages.is_empty() {
        return Err(DocumentError::Template("template has no pages".to_string()));
    }
    if overlays.len() > pages.len() {
        log::warn!(
            "{} overlay pages but the template has only {}; extra pages dropped",
            overlays.len(),
            pages.len()
        );
    }

    let font_ids = (fonts.regular.add_to(&mut doc), fonts.bold.add_to(&mut doc));
    for (page_id, overlay) in pages.iter().zip(overlays) {
        stamp_page(&mut doc, *page_id, overlay, fonts, font_ids)?;
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| DocumentError::Output(e.to_string()))?;
    Ok(output)
}
