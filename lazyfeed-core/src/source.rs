use std::sync::Arc;

use im::Vector;

use crate::{
    error::Error,
    post::{create_posts, Post},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub items: Vector<Arc<Post>>,
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where new posts come from.
pub trait PostSource: Send + Sync {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Page, Error>;
}

impl<S: PostSource + ?Sized> PostSource for Arc<S> {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Page, Error> {
        (**self).fetch(offset, limit)
    }
}

/// Generates posts locally, never fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyntheticSource;

impl PostSource for SyntheticSource {
    fn fetch(&self, offset: usize, limit: usize) -> Result<Page, Error> {
        Ok(Page {
            items: create_posts(offset, limit),
            offset,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_page_matches_request() {
        let page = SyntheticSource.fetch(50, 20).unwrap();
        assert_eq!(page.offset, 50);
        assert_eq!(page.limit, 20);
        assert_eq!(page.len(), 20);
        assert_eq!(page.items.front().map(|p| p.number), Some(51));
        assert_eq!(page.items.back().map(|p| p.number), Some(70));
    }

    #[test]
    fn shared_source_delegates() {
        let source: Arc<dyn PostSource> = Arc::new(SyntheticSource);
        assert!(source.fetch(0, 0).unwrap().is_empty());
    }
}
