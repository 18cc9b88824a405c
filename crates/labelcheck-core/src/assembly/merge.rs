//! Splicing attachment pages after the cover page.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, warn};

use super::cover::CoverDocument;
use crate::email::PdfAttachment;
use crate::error::AssemblyError;
use crate::pdf::LoadedPdf;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Outcome of a merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPdf {
    /// Serialized merged document.
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Attachments whose pages were appended, in order.
    pub merged: Vec<String>,
    /// Attachments that could not be read.
    pub skipped: Vec<String>,
}

/// Append every readable attachment's pages, in order, after the cover.
///
/// An attachment that fails to parse is skipped with a warning. Failing
/// to serialize the result is an error.
pub fn merge_attachments(
    cover: CoverDocument,
    attachments: &[PdfAttachment],
) -> Result<MergedPdf, AssemblyError> {
    let CoverDocument {
        mut document,
        pages_id,
        mut page_ids,
    } = cover;

    let mut merged = Vec::new();
    let mut skipped = Vec::new();

    for attachment in attachments {
        let source = match LoadedPdf::load(&attachment.data) {
            Ok(pdf) => pdf.into_document(),
            Err(e) => {
                warn!("Could not merge {}: {}", attachment.filename, e);
                skipped.push(attachment.filename.clone());
                continue;
            }
        };

        let added = append_pages(&mut document, pages_id, source)?;
        debug!("Appended {} page(s) from {}", added.len(), attachment.filename);
        page_ids.extend(added);
        merged.push(attachment.filename.clone());
    }

    let pages = document
        .get_object_mut(pages_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| AssemblyError::Merge(e.to_string()))?;
    pages.set(
        "Kids",
        page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    );
    pages.set("Count", page_ids.len() as i64);

    document.prune_objects();
    document.compress();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| AssemblyError::Write(e.to_string()))?;

    info!(
        "Merged {} attachment(s) into {} page(s), skipped {}",
        merged.len(),
        page_ids.len(),
        skipped.len()
    );

    Ok(MergedPdf {
        bytes,
        page_count: page_ids.len(),
        merged,
        skipped,
    })
}

/// Move all of `source`'s objects into `target` and re-parent its pages.
fn append_pages(
    target: &mut Document,
    target_pages: ObjectId,
    mut source: Document,
) -> Result<Vec<ObjectId>, AssemblyError> {
    source.renumber_objects_with(target.max_id + 1);

    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

    for page_id in &page_ids {
        let inherited = inherited_attributes(&source, *page_id);
        let page = source
            .get_object_mut(*page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| AssemblyError::Merge(e.to_string()))?;

        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", target_pages);
    }

    target.objects.extend(source.objects);
    target.max_id = target
        .objects
        .keys()
        .map(|(id, _)| *id)
        .max()
        .unwrap_or(target.max_id);

    Ok(page_ids)
}

/// Attributes the page lacks but an ancestor `Pages` node defines.
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(Vec<u8>, Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = parent_of(page);
    let mut depth = 0;

    while let Some(parent_id) = parent {
        // Malformed trees can loop.
        depth += 1;
        if depth > 32 {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        for key in INHERITABLE {
            let already = page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key);
            if !already {
                if let Ok(value) = node.get(key) {
                    found.push((key.to_vec(), value.clone()));
                }
            }
        }
        parent = parent_of(node);
    }

    found
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    dict.get(b"Parent").and_then(Object::as_reference).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::build_cover_page;
    use crate::email::{EmailFields, EmailTables};
    use lopdf::dictionary;
    use pretty_assertions::assert_eq;

    /// A two-page PDF whose pages inherit `MediaBox` from the page tree.
    fn two_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_a = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        let page_b = doc.add_object(dictionary! { "Type" => "Page", "Parent" => pages_id });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_a.into(), page_b.into()],
                "Count" => 2,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn cover() -> CoverDocument {
        build_cover_page(&EmailFields::default(), &EmailTables::default()).unwrap()
    }

    #[test]
    fn test_attachments_follow_cover_in_order() {
        let attachments = vec![
            PdfAttachment {
                filename: "a.pdf".to_string(),
                data: two_page_pdf(),
            },
            PdfAttachment {
                filename: "broken.pdf".to_string(),
                data: b"%PDF-1.4 garbage".to_vec(),
            },
            PdfAttachment {
                filename: "b.pdf".to_string(),
                data: two_page_pdf(),
            },
        ];

        let merged = merge_attachments(cover(), &attachments).unwrap();
        assert_eq!(merged.page_count, 5);
        assert_eq!(merged.merged, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
        assert_eq!(merged.skipped, vec!["broken.pdf".to_string()]);

        let reloaded = Document::load_mem(&merged.bytes).unwrap();
        let pages = reloaded.get_pages();
        assert_eq!(pages.len(), 5);

        let last = reloaded.get_dictionary(pages[&5]).unwrap();
        assert!(last.has(b"MediaBox"));
    }

    #[test]
    fn test_cover_only() {
        let merged = merge_attachments(cover(), &[]).unwrap();
        assert_eq!(merged.page_count, 1);
        assert!(merged.bytes.starts_with(b"%PDF-1.5"));
    }
}
