//! # Paginated Collections
//!
//! Cursor pagination over resolved collections. Cursors are opaque
//! (base64 of `arrayconnection:<offset>`) and stable for a given ordering.

use crate::error::{CatalogError, CatalogResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Pagination arguments of a collection field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageArgs {
    #[serde(default)]
    pub first: Option<usize>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub last: Option<usize>,
    #[serde(default)]
    pub before: Option<String>,
}

impl PageArgs {
    /// First `n` items
    pub fn first(n: usize) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    /// Builder: continue after a cursor
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Offsets `[start, end)` selected from `len` items, plus page flags
    fn window(&self, len: usize) -> CatalogResult<(usize, usize, bool, bool)> {
        let lower = match &self.after {
            Some(cursor) => decode_cursor(cursor)?.saturating_add(1).min(len),
            None => 0,
        };
        let upper = match &self.before {
            Some(cursor) => decode_cursor(cursor)?.min(len),
            None => len,
        };
        let upper = upper.max(lower);

        let mut start = lower;
        let mut end = upper;
        if let Some(first) = self.first {
            end = end.min(start.saturating_add(first));
        }
        if let Some(last) = self.last {
            start = start.max(end.saturating_sub(last));
        }

        let has_previous = self.last.is_some() && start > lower;
        let has_next = self.first.is_some() && end < upper;
        Ok((start, end, has_previous, has_next))
    }
}

/// Opaque cursor for an offset
pub fn encode_cursor(offset: usize) -> String {
    STANDARD.encode(format!("{CURSOR_PREFIX}{offset}"))
}

/// Offset of an opaque cursor
pub fn decode_cursor(cursor: &str) -> CatalogResult<usize> {
    let invalid = || CatalogError::InvalidCursor(cursor.to_string());
    let raw = STANDARD.decode(cursor).map_err(|_| invalid())?;
    let raw = String::from_utf8(raw).map_err(|_| invalid())?;
    raw.strip_prefix(CURSOR_PREFIX)
        .and_then(|offset| offset.parse().ok())
        .ok_or_else(invalid)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// One page of a collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: usize,
}

impl<T> Connection<T> {
    /// Slice `items` according to `args`
    pub fn from_vec(items: Vec<T>, args: &PageArgs) -> CatalogResult<Self> {
        let total_count = items.len();
        let (start, end, has_previous_page, has_next_page) = args.window(total_count)?;

        let edges: Vec<Edge<T>> = items
            .into_iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(offset, node)| Edge {
                cursor: encode_cursor(offset),
                node,
            })
            .collect();

        Ok(Self {
            page_info: PageInfo {
                has_next_page,
                has_previous_page,
                start_cursor: edges.first().map(|e| e.cursor.clone()),
                end_cursor: edges.last().map(|e| e.cursor.clone()),
            },
            edges,
            total_count,
        })
    }

    /// Replace the nodes of this page, in order, keeping cursors.
    ///
    /// `nodes` must hold one item per edge; extra items are ignored.
    pub fn zip_nodes<U>(self, nodes: impl IntoIterator<Item = U>) -> Connection<U> {
        Connection {
            edges: self
                .edges
                .into_iter()
                .zip(nodes)
                .map(|(edge, node)| Edge {
                    cursor: edge.cursor,
                    node,
                })
                .collect(),
            page_info: self.page_info,
            total_count: self.total_count,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.edges.into_iter().map(|e| e.node).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        assert_eq!(encode_cursor(0), "YXJyYXljb25uZWN0aW9uOjA=");
        assert_eq!(decode_cursor(&encode_cursor(17)).unwrap(), 17);
        assert!(decode_cursor("bm9wZQ==").is_err());
    }

    #[test]
    fn test_unbounded_page() {
        let page = Connection::from_vec(vec![1, 2, 3], &PageArgs::default()).unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.edges.len(), 3);
        assert!(!page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
    }

    #[test]
    fn test_forward_pagination() {
        let items: Vec<i32> = (0..5).collect();
        let page = Connection::from_vec(items.clone(), &PageArgs::first(2)).unwrap();
        assert_eq!(page.nodes().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert!(page.page_info.has_next_page);

        let cursor = page.page_info.end_cursor.clone().unwrap();
        let next = Connection::from_vec(items.clone(), &PageArgs::first(2).after(cursor)).unwrap();
        assert_eq!(next.into_nodes(), vec![2, 3]);

        let tail = Connection::from_vec(items, &PageArgs::first(2).after(encode_cursor(3))).unwrap();
        assert_eq!(tail.nodes().count(), 1);
        assert!(!tail.page_info.has_next_page);
    }

    #[test]
    fn test_backward_pagination() {
        let args = PageArgs {
            last: Some(2),
            before: Some(encode_cursor(4)),
            ..PageArgs::default()
        };
        let page = Connection::from_vec((0..5).collect::<Vec<i32>>(), &args).unwrap();
        assert_eq!(page.into_nodes(), vec![2, 3]);
    }

    #[test]
    fn test_zip_nodes_keeps_cursors() {
        let page = Connection::from_vec(vec![10, 20, 30], &PageArgs::first(2)).unwrap();
        let cursors: Vec<String> = page.edges.iter().map(|e| e.cursor.clone()).collect();
        let renamed = page.zip_nodes(["a", "b"]);
        assert_eq!(renamed.edges[1].cursor, cursors[1]);
        assert_eq!(renamed.into_nodes(), vec!["a", "b"]);
    }

    #[test]
    fn test_huge_client_offsets_clamp() {
        let page =
            Connection::from_vec(vec![1, 2, 3], &PageArgs::first(usize::MAX).after(encode_cursor(0)))
                .unwrap();
        assert_eq!(page.nodes().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert!(!page.page_info.has_next_page);

        let past_end = Connection::from_vec(
            vec![1, 2, 3],
            &PageArgs::default().after(encode_cursor(usize::MAX)),
        )
        .unwrap();
        assert_eq!(past_end.edges.len(), 0);
        assert_eq!(past_end.total_count, 3);
    }

    #[test]
    fn test_empty_page_has_no_cursors() {
        let page = Connection::<i32>::from_vec(Vec::new(), &PageArgs::first(10)).unwrap();
        assert!(page.page_info.start_cursor.is_none());
        assert_eq!(page.zip_nodes(Vec::<String>::new()).total_count, 0);
    }
}
