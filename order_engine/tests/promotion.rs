mod common;

use common::{new_test_api, simple_order};
use order_engine::db_types::OrderStatus;

#[tokio::test]
async fn promotes_exactly_the_pending_orders() {
    let api = new_test_api().await;
    let mut pending_ids = Vec::new();
    for i in 0..3 {
        let full = api.create_order(simple_order("A", &format!("a{i}@x.com"))).await.unwrap();
        pending_ids.push(full.order.id);
    }
    let shipped_id = api.create_order(simple_order("B", "b@x.com")).await.unwrap().order.id;
    api.update_status(&shipped_id, OrderStatus::Shipped, "ops@x.com").await.unwrap();

    let promoted = api.promote_pending().await.unwrap();
    assert_eq!(promoted.len(), 3);
    assert!(promoted.iter().all(|o| o.status == OrderStatus::Processing));
    let mut promoted_ids = promoted.iter().map(|o| o.id.clone()).collect::<Vec<_>>();
    promoted_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    pending_ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(promoted_ids, pending_ids);

    // The whole batch carries one shared timestamp.
    let stamp = promoted[0].updated_at;
    assert!(promoted.iter().all(|o| o.updated_at == stamp));

    // The shipped order is untouched.
    let shipped = api.fetch_order(&shipped_id).await.unwrap();
    assert_eq!(shipped.order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn promotion_is_a_noop_when_nothing_is_pending() {
    let api = new_test_api().await;
    assert!(api.promote_pending().await.unwrap().is_empty());

    api.create_order(simple_order("A", "a@x.com")).await.unwrap();
    assert_eq!(api.promote_pending().await.unwrap().len(), 1);
    // Everything already promoted: the next sweep has nothing to do.
    assert!(api.promote_pending().await.unwrap().is_empty());
}

#[tokio::test]
async fn promoted_orders_show_up_in_status_queries() {
    let api = new_test_api().await;
    for i in 0..2 {
        api.create_order(simple_order("A", &format!("a{i}@x.com"))).await.unwrap();
    }
    api.promote_pending().await.unwrap();

    let processing = api.fetch_orders(Some(OrderStatus::Processing), 1, 10).await.unwrap();
    assert_eq!(processing.total, 2);
    let pending = api.fetch_orders(Some(OrderStatus::Pending), 1, 10).await.unwrap();
    assert_eq!(pending.total, 0);
}
