use ndarray::{Array2, ArrayView2, Axis};
use serde::Serialize;

/// Masks for a whole batch: `true` selects, `false` excludes.
///
/// The masks are plain owned values; whatever estimator consumes them must
/// not expect anything to flow back through them.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchMask {
    /// Per-graph masks concatenated along rows.
    Stacked(Array2<bool>),
    /// One mask per graph, in graph order.
    List(Vec<Array2<bool>>),
}

impl BatchMask {
    pub fn is_list(&self) -> bool {
        matches!(self, BatchMask::List(_))
    }

    pub fn as_stacked(&self) -> Option<&Array2<bool>> {
        match self {
            BatchMask::Stacked(mask) => Some(mask),
            BatchMask::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Array2<bool>]> {
        match self {
            BatchMask::Stacked(_) => None,
            BatchMask::List(masks) => Some(masks),
        }
    }

    pub fn to_document(&self) -> MaskDocument {
        match self {
            BatchMask::Stacked(mask) => MaskDocument {
                layout: MaskLayout::Stacked,
                masks: vec![to_rows(mask.view())],
            },
            BatchMask::List(masks) => MaskDocument {
                layout: MaskLayout::List,
                masks: masks.iter().map(|mask| to_rows(mask.view())).collect(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskLayout {
    Stacked,
    List,
}

/// JSON form of a [`BatchMask`]; a stacked mask is a single entry.
#[derive(Debug, Clone, Serialize)]
pub struct MaskDocument {
    pub layout: MaskLayout,
    pub masks: Vec<Vec<Vec<u8>>>,
}

fn to_rows(mask: ArrayView2<'_, bool>) -> Vec<Vec<u8>> {
    mask.axis_iter(Axis(0))
        .map(|row| row.iter().map(|&selected| u8::from(selected)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn document_encodes_zero_one_rows() {
        let mask = BatchMask::List(vec![array![[true, false]], array![[false], [true]]]);
        let json = serde_json::to_string(&mask.to_document()).expect("json");
        assert_eq!(json, r#"{"layout":"list","masks":[[[1,0]],[[0],[1]]]}"#);
    }

    #[test]
    fn stacked_is_a_single_matrix() {
        let mask = BatchMask::Stacked(array![[true], [false]]);
        assert!(!mask.is_list());
        let document = mask.to_document();
        assert_eq!(document.layout, MaskLayout::Stacked);
        assert_eq!(document.masks, vec![vec![vec![1], vec![0]]]);
    }
}
