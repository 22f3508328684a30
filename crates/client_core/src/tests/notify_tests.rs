use super::*;

#[tokio::test]
async fn every_subscriber_receives_each_notification() {
    let notifier = Notifier::new();
    let mut first = notifier.subscribe();
    let mut second = notifier.subscribe();

    let id = notifier.success("Person added");

    for rx in [&mut first, &mut second] {
        let notification = rx.recv().await.expect("notification");
        assert_eq!(notification.id, id);
        assert_eq!(notification.message, "Person added");
        assert_eq!(notification.level, NotificationLevel::Success);
        assert_eq!(notification.duration, DEFAULT_DURATION);
    }
}

#[tokio::test]
async fn ids_increase_across_clones() {
    let notifier = Notifier::new();
    let clone = notifier.clone();
    let mut rx = notifier.subscribe();

    let a = notifier.info("a");
    let b = clone.warning("b");
    let c = notifier.notify("c", NotificationLevel::Error, LONG_DURATION);
    assert!(a < b && b < c);

    assert_eq!(rx.recv().await.expect("a").id, a);
    assert_eq!(rx.recv().await.expect("b").level, NotificationLevel::Warning);
    assert_eq!(rx.recv().await.expect("c").duration, LONG_DURATION);
}

#[test]
fn notifying_without_subscribers_is_a_no_op() {
    let notifier = Notifier::default();
    let first = notifier.error("nobody listens");
    let second = notifier.error("still nobody");
    assert_eq!(second, first + 1);
}

#[tokio::test]
async fn late_subscriber_misses_earlier_messages() {
    let notifier = Notifier::new();
    notifier.info("before");
    let mut rx = notifier.subscribe();
    notifier.info("after");
    assert_eq!(rx.recv().await.expect("after").message, "after");
}
