//! Concatenation of exported PDF files.

use log::debug;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to merge")]
    Empty,
}

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Moves pages of one document into another document's page tree.
///
/// Each page is flattened first: attributes it inherited from the source
/// tree are written onto the page itself, and its `Parent` link is dropped,
/// so nothing of the source page tree is carried over.
struct PageImporter<'a> {
    source: &'a Document,
    target: &'a mut Document,
    imported: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageImporter<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self { source, target, imported: HashMap::new() }
    }

    /// Imports `pages` in order and hangs them under `parent`.
    fn import_pages(&mut self, pages: &[ObjectId], parent: ObjectId) -> Result<Vec<ObjectId>, lopdf::Error> {
        // Annotations point back at their page, so page ids are allocated up front.
        let reserved: Vec<ObjectId> = pages
            .iter()
            .map(|page_id| {
                let new_id = self.target.add_object(Object::Null);
                self.imported.insert(*page_id, new_id);
                new_id
            })
            .collect();

        for (page_id, new_id) in pages.iter().zip(&reserved) {
            let mut page = self.source.get_dictionary(*page_id)?.clone();
            self.inherit(&mut page)?;
            page.remove(b"Parent");
            let mut page = self.remap_dict(page)?;
            page.set("Parent", Object::Reference(parent));
            self.target.objects.insert(*new_id, Object::Dictionary(page));
        }
        Ok(reserved)
    }

    /// Fills in inheritable attributes the page does not set itself, nearest
    /// ancestor first.
    fn inherit(&self, page: &mut Dictionary) -> Result<(), lopdf::Error> {
        let mut visited = HashSet::new();
        let mut ancestor = page.get(b"Parent").and_then(Object::as_reference).ok();
        while let Some(node_id) = ancestor {
            if !visited.insert(node_id) {
                break;
            }
            let node = self.source.get_dictionary(node_id)?;
            for key in INHERITABLE_KEYS {
                if !page.has(key) {
                    if let Ok(value) = node.get(key) {
                        page.set(key.to_vec(), value.clone());
                    }
                }
            }
            ancestor = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Ok(())
    }

    fn import_object(&mut self, source_id: ObjectId) -> Result<ObjectId, lopdf::Error> {
        if let Some(target_id) = self.imported.get(&source_id) {
            return Ok(*target_id);
        }
        let new_id = self.target.add_object(Object::Null);
        self.imported.insert(source_id, new_id);

        let object = self.source.get_object(source_id)?.clone();
        let object = self.remap(object)?;
        self.target.objects.insert(new_id, object);
        Ok(new_id)
    }

    fn remap(&mut self, object: Object) -> Result<Object, lopdf::Error> {
        match object {
            Object::Reference(id) => Ok(Object::Reference(self.import_object(id)?)),
            Object::Array(items) => items
                .into_iter()
                .map(|o| self.remap(o))
                .collect::<Result<Vec<_>, _>>()
                .map(Object::Array),
            Object::Dictionary(dict) => self.remap_dict(dict).map(Object::Dictionary),
            Object::Stream(mut stream) => {
                stream.dict = self.remap_dict(stream.dict)?;
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    fn remap_dict(&mut self, mut dict: Dictionary) -> Result<Dictionary, lopdf::Error> {
        for (_, value) in dict.iter_mut() {
            *value = self.remap(std::mem::replace(value, Object::Null))?;
        }
        Ok(dict)
    }
}

/// Appends every page of `source` to the end of `target`'s page tree.
fn append_pages(target: &mut Document, source: &Document) -> Result<usize, MergeError> {
    // get_pages is keyed by page number, so iteration is already in order.
    let source_pages: Vec<ObjectId> = source.get_pages().into_values().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }

    let root_id = target.trailer.get(b"Root")?.as_reference()?;
    let pages_id = target.get_object(root_id)?.as_dict()?.get(b"Pages")?.as_reference()?;
    let imported = PageImporter::new(source, target).import_pages(&source_pages, pages_id)?;

    let pages_dict = target.get_object_mut(pages_id)?.as_dict_mut()?;
    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(imported.iter().map(|id| Object::Reference(*id)));
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", count + i64::try_from(imported.len()).unwrap_or(i64::MAX));
    Ok(imported.len())
}

/// Merges the given PDF files, in order, into one document.
///
/// Each input keeps its pages and resources; the first input supplies the
/// document catalog.
pub fn merge_pdfs<B: AsRef<[u8]>>(inputs: &[B]) -> Result<Vec<u8>, MergeError> {
    let (first, rest) = inputs.split_first().ok_or(MergeError::Empty)?;
    let mut merged = Document::load_mem(first.as_ref())?;
    for input in rest {
        let source = Document::load_mem(input.as_ref())?;
        let added = append_pages(&mut merged, &source)?;
        debug!("Appended {added} pages to merged document.");
    }

    let mut out = Vec::new();
    merged.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PdfExporter;
    use lopdf::{dictionary, Stream};
    use quire_types::{LineKind, RenderedDocument, RenderedLine, RenderedPage};

    fn pdf_bytes(pages: usize, label: &str) -> Vec<u8> {
        let mut document = RenderedDocument::new(label);
        for i in 0..pages {
            document.pages.push(RenderedPage {
                lines: vec![RenderedLine::new(LineKind::Detail, vec![format!("{label} {i}")])],
            });
        }
        let mut pdf = PdfExporter::new().build(&document).unwrap();
        let mut out = Vec::new();
        pdf.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn test_merge_appends_pages_in_order() {
        let merged = merge_pdfs(&[pdf_bytes(2, "first"), pdf_bytes(3, "second")]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 5);

        let root_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        let root = doc.get_object(root_id).unwrap().as_dict().unwrap();
        let pages_id = root.get(b"Pages").unwrap().as_reference().unwrap();
        for page_id in pages.values() {
            let page = doc.get_object(*page_id).unwrap().as_dict().unwrap();
            assert_eq!(page.get(b"Parent").unwrap().as_reference().unwrap(), pages_id);
        }
    }

    #[test]
    fn test_merge_single_input_round_trips() {
        let merged = merge_pdfs(&[pdf_bytes(1, "only")]).unwrap();
        assert_eq!(Document::load_mem(&merged).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn test_merge_nothing_is_an_error() {
        let inputs: [Vec<u8>; 0] = [];
        assert!(matches!(merge_pdfs(&inputs), Err(MergeError::Empty)));
    }

    #[test]
    fn test_merge_rejects_garbage() {
        assert!(matches!(
            merge_pdfs(&[b"not a pdf".to_vec()]),
            Err(MergeError::Pdf(_))
        ));
    }

    /// Two pages whose media box and fonts live on the `/Pages` node; the
    /// second page overrides the media box.
    fn inherited_pdf() -> Vec<u8> {
        let mut pdf = Document::with_version("1.5");
        let pages_id = pdf.new_object_id();
        let font_id = pdf.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let mut kids = Vec::new();
        let media_boxes: [Option<Vec<Object>>; 2] =
            [None, Some(vec![0_i64.into(), 0_i64.into(), 200_i64.into(), 100_i64.into()])];
        for media_box in media_boxes {
            let content_id = pdf.add_object(Stream::new(dictionary! {}, b"BT /F1 9 Tf ET".to_vec()));
            let mut page = dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            };
            if let Some(media_box) = media_box {
                page.set("MediaBox", media_box);
            }
            kids.push(Object::from(pdf.add_object(page)));
        }
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2_i64,
                "MediaBox" => vec![0_i64.into(), 0_i64.into(), 612_i64.into(), 792_i64.into()],
                "Rotate" => 90_i64,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            }),
        );
        let catalog_id = pdf.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        pdf.trailer.set("Root", catalog_id);
        let mut out = Vec::new();
        pdf.save_to(&mut out).unwrap();
        out
    }

    fn media_width(page: &Dictionary) -> i64 {
        page.get(b"MediaBox").unwrap().as_array().unwrap()[2].as_i64().unwrap()
    }

    #[test]
    fn test_merge_flattens_inherited_page_attributes() {
        let merged = merge_pdfs(&[pdf_bytes(1, "own"), inherited_pdf()]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 3);

        let second = doc.get_dictionary(pages[&2]).unwrap();
        assert_eq!(media_width(second), 612);
        assert_eq!(second.get(b"Rotate").unwrap().as_i64().unwrap(), 90);
        let resources = match second.get(b"Resources").unwrap() {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
            other => other.as_dict().unwrap(),
        };
        assert!(resources.get(b"Font").is_ok());

        let third = doc.get_dictionary(pages[&3]).unwrap();
        assert_eq!(media_width(third), 200);
    }

    #[test]
    fn test_merge_leaves_a_single_page_tree_node() {
        let merged = merge_pdfs(&[pdf_bytes(1, "own"), inherited_pdf()]).unwrap();
        let doc = Document::load_mem(&merged).unwrap();
        let page_tree_nodes = doc
            .objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| d.get(b"Type").and_then(Object::as_name).ok() == Some(b"Pages".as_slice()))
            .count();
        assert_eq!(page_tree_nodes, 1);
    }
}
