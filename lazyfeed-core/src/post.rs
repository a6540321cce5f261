use std::sync::Arc;

use im::Vector;
use rand::Rng;

pub const NAMES: [&str; 10] = [
    "Alice", "Jhon", "Smith", "Taro", "Jun", "Debit", "Mike", "Kebin", "Dain", "Kein",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    /// 1-based position of the post in the feed.
    pub number: usize,
    pub nickname: Arc<str>,
    pub caption: Arc<str>,
}

impl Post {
    pub fn new(number: usize, nickname: impl Into<Arc<str>>) -> Self {
        Self {
            number,
            nickname: nickname.into(),
            caption: format!("This is caption number {number}.").into(),
        }
    }
}

/// Generates `count` posts numbered `offset + 1 ..= offset + count`, each with a
/// nickname picked at random from [`NAMES`].
pub fn create_posts(offset: usize, count: usize) -> Vector<Arc<Post>> {
    create_posts_with(&mut rand::rng(), offset, count)
}

pub fn create_posts_with<R>(rng: &mut R, offset: usize, count: usize) -> Vector<Arc<Post>>
where
    R: Rng + ?Sized,
{
    (offset + 1..=offset + count)
        .map(|number| {
            let name = NAMES[rng.random_range(0..NAMES.len())];
            Arc::new(Post::new(number, name))
        })
        .collect()
}
