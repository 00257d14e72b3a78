//! Per-category running totals backing the progress bars.

use serde::{Deserialize, Serialize};

use crate::models::Category;

/// Sum of `amount` per known category. Serializes as
/// `{"pastry": _, "photo_video": _, "entertainment": _, "styling": _}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub pastry: i64,
    pub photo_video: i64,
    pub entertainment: i64,
    pub styling: i64,
}

impl CategoryTotals {
    /// Folds `(category, amount)` pairs into the four buckets.
    /// Pairs with an unrecognized category are dropped. Buckets saturate at
    /// `i64::MAX` instead of wrapping.
    pub fn tally<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, i64)>,
    {
        let mut totals = Self::default();
        for (category, amount) in entries {
            if let Some(category) = Category::parse(category) {
                let bucket = totals.bucket_mut(category);
                *bucket = bucket.saturating_add(amount);
            }
        }
        totals
    }

    pub fn get(&self, category: Category) -> i64 {
        match category {
            Category::Pastry => self.pastry,
            Category::PhotoVideo => self.photo_video,
            Category::Entertainment => self.entertainment,
            Category::Styling => self.styling,
        }
    }

    pub fn sum(&self) -> i64 {
        Category::ALL
            .iter()
            .fold(0_i64, |acc, c| acc.saturating_add(self.get(*c)))
    }

    fn bucket_mut(&mut self, category: Category) -> &mut i64 {
        match category {
            Category::Pastry => &mut self.pastry,
            Category::PhotoVideo => &mut self.photo_video,
            Category::Entertainment => &mut self.entertainment,
            Category::Styling => &mut self.styling,
        }
    }
}
