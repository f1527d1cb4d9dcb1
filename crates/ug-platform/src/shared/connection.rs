//! Relay-style connection types returned by cursor-paginated listings.

use serde::Serialize;

use crate::shared::cursor::encode_cursor;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    /// Backward paging is not supported; always `false`.
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

impl<T> Connection<T> {
    /// Build a page from rows that begin at `offset`. Each edge's cursor
    /// encodes its own absolute offset.
    pub fn from_slice(nodes: Vec<T>, offset: i64, has_next_page: bool, total_count: i64) -> Self {
        let edges: Vec<Edge<T>> = nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| Edge {
                cursor: encode_cursor(offset + index as i64),
                node,
            })
            .collect();

        let page_info = PageInfo {
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
            has_previous_page: false,
            has_next_page,
        };

        Self { edges, page_info, total_count }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|e| &e.node)
    }
}
