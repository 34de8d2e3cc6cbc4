use super::client::ArmClient;
use super::error::ArmResult;
use serde::{Deserialize, de::DeserializeOwned};
use std::marker::PhantomData;

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

/// Walks a Resource Manager list by following `nextLink`.
///
/// Pages are fetched lazily, one per [`Pager::next_page`] call. The pager is
/// finite and cannot be restarted; after the first error it yields nothing.
pub struct Pager<'a, T> {
    client: &'a ArmClient,
    next: Option<String>,
    _item: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> Pager<'a, T> {
    pub fn new(client: &'a ArmClient, first: String) -> Self {
        Self {
            client,
            next: Some(first),
            _item: PhantomData,
        }
    }

    pub fn more(&self) -> bool {
        self.next.is_some()
    }

    pub async fn next_page(&mut self) -> Option<ArmResult<Vec<T>>> {
        let url = self.next.take()?;

        match self.client.get_json::<Page<T>>(&url).await {
            Ok(page) => {
                self.next = page.next_link.filter(|link| !link.is_empty());
                Some(Ok(page.value))
            }
            Err(err) => Some(Err(err)),
        }
    }

    /// Drains every page in order. The first failing page aborts the walk and
    /// nothing gathered so far is returned.
    pub async fn collect_all(mut self) -> ArmResult<Vec<T>> {
        let mut items = Vec::new();

        while let Some(page) = self.next_page().await {
            items.extend(page?);
        }

        Ok(items)
    }
}
