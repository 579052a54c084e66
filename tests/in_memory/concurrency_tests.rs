//! Events dispatched as concurrent units of work.

use crate::in_memory::helpers::harness;
use rstest::rstest;
use tasker::chat::InboundEvent;
use tasker::session::ActiveSlider;
use tasker::user::domain::UserId;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_next_presses_are_serialized() -> eyre::Result<()> {
    let h = harness().await?;
    let owner = h.member(1, "Olga").await?;
    let assignee = h.member(2, "Ivan").await?;
    for title in ["One", "Two", "Three"] {
        h.task(owner, assignee, title).await?;
    }
    h.texts(assignee, &["Inbox", "New"]).await;

    let first = h.dispatcher.dispatch(InboundEvent::text(assignee, "Next"));
    let second = h.dispatcher.dispatch(InboundEvent::text(assignee, "Next"));
    first.await?;
    second.await?;

    let session = h.session(assignee).await;
    let Some(ActiveSlider::Tasks { slider, .. }) = session.slider() else {
        return Err(eyre::eyre!("task slider closed"));
    };
    assert_eq!(slider.cursor(), 3);
    assert_eq!(slider.len(), 3);
    assert_eq!(session.focused_task().map(|id| id.value()), Some(3));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn first_contacts_create_one_session_each() -> eyre::Result<()> {
    let h = harness().await?;
    let identities = (1..=16)
        .map(UserId::new)
        .collect::<Result<Vec<_>, _>>()?;

    let handles: Vec<_> = identities
        .iter()
        .map(|identity| h.dispatcher.dispatch(InboundEvent::text(*identity, "hello")))
        .collect();
    for handle in handles {
        handle.await?;
    }

    assert_eq!(h.dispatcher.sessions().len().await, identities.len());
    for identity in &identities {
        assert_eq!(h.texts_for(*identity).len(), 1);
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_first_contacts_share_a_session() -> eyre::Result<()> {
    let h = harness().await?;
    let identity = UserId::new(42)?;

    let handles: Vec<_> = (0..8)
        .map(|_| h.dispatcher.dispatch(InboundEvent::text(identity, "hello")))
        .collect();
    for handle in handles {
        handle.await?;
    }

    assert_eq!(h.dispatcher.sessions().len().await, 1);
    assert_eq!(h.texts_for(identity).len(), 8);
    Ok(())
}
