//! Draining paginated query and scan operations.

use crate::codec::decode;
use crate::model::Attributes;

use super::error::Result;
use super::traits::StoreClient;
use super::types::{Key, QueryRequest, ScanRequest};

/// A paginated read operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadRequest {
    Query(QueryRequest),
    Scan(ScanRequest),
}

impl ReadRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            ReadRequest::Query(_) => "Query",
            ReadRequest::Scan(_) => "Scan",
        }
    }

    pub fn table_name(&self) -> &str {
        match self {
            ReadRequest::Query(request) => &request.table_name,
            ReadRequest::Scan(request) => &request.table_name,
        }
    }

    fn set_exclusive_start_key(&mut self, key: Key) {
        match self {
            ReadRequest::Query(request) => request.exclusive_start_key = Some(key),
            ReadRequest::Scan(request) => request.exclusive_start_key = Some(key),
        }
    }
}

/// Fetches every page of `request` and decodes all items, in store order.
///
/// Each request carries the previous page's `LastEvaluatedKey` until a page
/// arrives without one. A failed page or an undecodable item aborts the whole
/// read; items from earlier pages are dropped.
pub async fn fetch_all<C>(client: &C, mut request: ReadRequest) -> Result<Vec<Attributes>>
where
    C: StoreClient + ?Sized,
{
    let mut items = Vec::new();
    let mut page = 0_usize;

    loop {
        let response = match &request {
            ReadRequest::Query(query) => client.query(query.clone()).await,
            ReadRequest::Scan(scan) => client.scan(scan.clone()).await,
        };
        page += 1;

        if !response.ok {
            tracing::warn!(
                operation = request.operation(),
                table = request.table_name(),
                page,
                error = ?response.body.message,
                "Paged read failed"
            );
        }
        let body = response.into_body()?;

        tracing::debug!(
            operation = request.operation(),
            table = request.table_name(),
            page,
            count = body.items.len(),
            "Fetched page"
        );

        for item in &body.items {
            items.push(decode(item)?);
        }

        match body.last_evaluated_key {
            Some(key) if !key.is_empty() => request.set_exclusive_start_key(key),
            _ => break,
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::storage::{AttributeValue, RepositoryError, StoreResponse};
    use crate::testing::{page, ScriptedStore};

    fn scan_request() -> ReadRequest {
        ReadRequest::Scan(ScanRequest {
            table_name: "widgets".to_string(),
            scan_filter: Default::default(),
            limit: None,
            exclusive_start_key: None,
        })
    }

    fn ids(items: &[Attributes]) -> Vec<String> {
        items
            .iter()
            .map(|item| match &item["id"] {
                Value::Str(s) => s.clone(),
                other => panic!("unexpected id {:?}", other),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_all_merges_pages_in_order() {
        let store = ScriptedStore::new();
        store.push_scan(page(&["a", "b"], Some("b")));
        store.push_scan(page(&["c"], Some("c")));
        store.push_scan(page(&["d", "e"], None));

        let items = fetch_all(&store, scan_request()).await.unwrap();

        assert_eq!(ids(&items), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(store.scan_calls(), 3);
    }

    #[tokio::test]
    async fn test_fetch_all_passes_continuation_token() {
        let store = ScriptedStore::new();
        store.push_scan(page(&["a"], Some("a")));
        store.push_scan(page(&["b"], None));

        fetch_all(&store, scan_request()).await.unwrap();

        let requests = store.scan_requests();
        assert_eq!(requests[0].exclusive_start_key, None);
        assert_eq!(
            requests[1].exclusive_start_key.as_ref().unwrap()["id"],
            AttributeValue::S("a".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_all_single_item_page() {
        let store = ScriptedStore::new();
        store.push_scan(page(&["only"], None));

        let items = fetch_all(&store, scan_request()).await.unwrap();
        assert_eq!(ids(&items), vec!["only"]);
    }

    #[tokio::test]
    async fn test_fetch_all_empty_scan() {
        let store = ScriptedStore::new();
        store.push_scan(page(&[], None));

        let items = fetch_all(&store, scan_request()).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_empty_token_ends() {
        let store = ScriptedStore::new();
        let mut first = page(&["a"], None);
        first.body.last_evaluated_key = Some(Default::default());
        store.push_scan(first);

        let items = fetch_all(&store, scan_request()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(store.scan_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_all_failure_discards_partial_results() {
        let store = ScriptedStore::new();
        store.push_scan(page(&["a", "b"], Some("b")));
        store.push_scan(StoreResponse::failure("Throughput exceeded"));
        store.push_scan(page(&["c"], None));

        let result = fetch_all(&store, scan_request()).await;

        assert_eq!(
            result,
            Err(RepositoryError::StoreRequest {
                message: "Throughput exceeded".to_string()
            })
        );
        assert_eq!(store.scan_calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_all_query_uses_query_operation() {
        let store = ScriptedStore::new();
        store.push_query(page(&["a"], Some("a")));
        store.push_query(page(&["b"], None));

        let request = ReadRequest::Query(QueryRequest {
            table_name: "widgets".to_string(),
            key_conditions: Default::default(),
            limit: Some(1),
            exclusive_start_key: None,
        });
        let items = fetch_all(&store, request).await.unwrap();

        assert_eq!(ids(&items), vec!["a", "b"]);
        assert_eq!(store.query_requests()[1].limit, Some(1));
        assert_eq!(store.scan_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_all_decode_failure_aborts() {
        let store = ScriptedStore::new();
        let mut bad = page(&["a"], None);
        bad.body.items[0].insert("flag".to_string(), AttributeValue::Bool(true));
        store.push_scan(bad);

        let result = fetch_all(&store, scan_request()).await;
        assert!(matches!(result, Err(RepositoryError::Decode(_))));
    }
}
