use askama::Template;
use wr_core::models::{Category, Donation, Pledge, SupportOffer};
use wr_core::totals::CategoryTotals;

/// One progress line on the dashboard: a category with its donated and
/// pledged figures side by side.
pub struct CategoryLine {
    pub category: Category,
    pub donated: i64,
    pub pledged: i64,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate<'a> {
    pub title: &'a str,
    pub donations: &'a [Donation],
    pub pledges: &'a [Pledge],
    pub support_offers: &'a [SupportOffer],
    pub lines: Vec<CategoryLine>,
    /// Sum over every donation, whatever its status
    pub total_donated: i64,
    /// Sum over every pledge, whatever its status
    pub total_pledged: i64,
}

impl<'a> AdminTemplate<'a> {
    pub fn new(
        donations: &'a [Donation],
        pledges: &'a [Pledge],
        support_offers: &'a [SupportOffer],
        donation_totals: CategoryTotals,
        pledge_totals: CategoryTotals,
    ) -> Self {
        let lines = Category::ALL
            .into_iter()
            .map(|category| CategoryLine {
                category,
                donated: donation_totals.get(category),
                pledged: pledge_totals.get(category),
            })
            .collect();

        Self {
            title: "Wedding Registry Admin",
            donations,
            pledges,
            support_offers,
            lines,
            total_donated: saturating_sum(donations.iter().map(|d| d.amount)),
            total_pledged: saturating_sum(pledges.iter().map(|p| p.amount)),
        }
    }
}

fn saturating_sum(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0, i64::saturating_add)
}
