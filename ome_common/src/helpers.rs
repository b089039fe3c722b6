use crate::Money;

/// Sums `quantity × unit price` over the given pairs.
///
/// This is a pure fold with no rounding of its own (amounts are already fixed-point), so it can
/// be reused for any line-item style total.
pub fn compute_total<I>(items: I) -> Money
where I: IntoIterator<Item = (i64, Money)> {
    items.into_iter().map(|(quantity, price)| price * quantity).sum()
}

#[cfg(test)]
mod test {
    use super::compute_total;
    use crate::Money;

    #[test]
    fn sums_quantity_times_price() {
        let items = vec![(2, Money::from_cents(1000)), (3, Money::from_cents(50))];
        assert_eq!(compute_total(items), Money::from_cents(2150));
    }

    #[test]
    fn empty_input_totals_zero() {
        assert_eq!(compute_total(std::iter::empty()), Money::from_cents(0));
    }

    #[test]
    fn order_of_items_does_not_matter() {
        let a = vec![(1, Money::from_cents(199)), (5, Money::from_cents(20)), (2, Money::from_cents(75))];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(compute_total(a), compute_total(b));
    }
}
