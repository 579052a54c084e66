//! User-store failures during registration and moderation.

use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;
use rstest::rstest;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tasker::chat::adapters::RecordingGateway;
use tasker::chat::{ConversationContext, Dispatcher, InboundEvent};
use tasker::session::{ActiveSlider, MenuNode, Session};
use tasker::task::adapters::InMemoryTaskRepository;
use tasker::user::domain::{
    DisplayName, ModerationKind, User, UserId, UserStatus, UserStatusChange,
};
use tasker::user::ports::{UserRepository, UserRepositoryError, UserRepositoryResult};

mock! {
    pub Users {}

    #[async_trait]
    impl UserRepository for Users {
        async fn store(&self, user: &User) -> UserRepositoryResult<()>;
        async fn update(&self, user: &User) -> UserRepositoryResult<()>;
        async fn update_status(&self, change: &UserStatusChange) -> UserRepositoryResult<()>;
        async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>>;
        async fn list_by_status(&self, statuses: &[UserStatus]) -> UserRepositoryResult<Vec<User>>;
        async fn list_admins(&self) -> UserRepositoryResult<Vec<User>>;
    }
}

type MockedDispatcher =
    Dispatcher<MockUsers, InMemoryTaskRepository, RecordingGateway, DefaultClock>;

/// Records shared between the mock's lookup and store expectations.
#[derive(Clone, Default)]
struct Directory(Arc<Mutex<HashMap<UserId, User>>>);

impl Directory {
    fn with(users: &[User]) -> Self {
        let directory = Self::default();
        for user in users {
            directory.put(user);
        }
        directory
    }

    fn get(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let records = self.0.lock().map_err(|_| unavailable())?;
        Ok(records.get(&id).cloned())
    }

    fn put(&self, user: &User) {
        if let Ok(mut records) = self.0.lock() {
            records.insert(user.id(), user.clone());
        }
    }
}

fn unavailable() -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other("database unavailable"))
}

fn admin() -> eyre::Result<User> {
    Ok(User::provision_admin(
        UserId::new(100)?,
        DisplayName::new("Root", "Admin"),
        &DefaultClock,
    ))
}

fn applicant(id: i64, first_name: &str) -> eyre::Result<User> {
    Ok(User::request_access(
        UserId::new(id)?,
        DisplayName::new(first_name, "Tester"),
        &DefaultClock,
    ))
}

fn lookups_from(users: &mut MockUsers, directory: &Directory) {
    let records = directory.clone();
    users
        .expect_find_by_id()
        .returning(move |id| records.get(id));
}

fn wire(users: MockUsers) -> (Arc<MockedDispatcher>, Arc<RecordingGateway>) {
    let gateway = Arc::new(RecordingGateway::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(users),
        Arc::new(InMemoryTaskRepository::new()),
        Arc::clone(&gateway),
        Arc::new(DefaultClock),
    ));
    (dispatcher, gateway)
}

async fn texts(dispatcher: &MockedDispatcher, identity: UserId, inputs: &[&str]) {
    for input in inputs {
        dispatcher.handle(InboundEvent::text(identity, *input)).await;
    }
}

async fn session(dispatcher: &MockedDispatcher, identity: UserId) -> Session {
    let session = dispatcher.sessions().get_or_create(identity).await;
    let guard = session.lock().await;
    guard.clone()
}

fn queue_cursor(session: &Session) -> Option<usize> {
    match session.slider() {
        Some(ActiveSlider::Users { slider, .. }) => Some(slider.cursor()),
        _ => None,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_approval_keeps_the_queue_position() -> eyre::Result<()> {
    let root = admin()?;
    let ann = applicant(1, "Ann")?;
    let directory = Directory::with(&[root.clone(), ann.clone()]);
    let mut users = MockUsers::new();
    lookups_from(&mut users, &directory);
    let queue = vec![ann.clone()];
    users
        .expect_list_by_status()
        .returning(move |_| Ok(queue.clone()));
    users
        .expect_update_status()
        .times(1)
        .returning(|_| Err(unavailable()));
    let (dispatcher, gateway) = wire(users);

    texts(&dispatcher, root.id(), &["Users", "Edit", "Approve"]).await;
    let before = session(&dispatcher, root.id()).await;
    assert_eq!(queue_cursor(&before), Some(1));

    texts(&dispatcher, root.id(), &["Approve"]).await;

    let notice = gateway
        .last_for(root.id().value())
        .ok_or_else(|| eyre::eyre!("no reply for the admin"))?;
    assert_eq!(notice.text, "Something went wrong while approving user :(");
    let after = session(&dispatcher, root.id()).await;
    assert_eq!(after.node(), MenuNode::Moderation(ModerationKind::Approve));
    assert_eq!(queue_cursor(&after), Some(1));
    assert!(gateway.texts_for(ann.id().value()).is_empty());
    assert_eq!(directory.get(ann.id())?.map(|user| user.status()), Some(UserStatus::Requested));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_queue_query_stays_on_edit_menu() -> eyre::Result<()> {
    let root = admin()?;
    let directory = Directory::with(&[root.clone()]);
    let mut users = MockUsers::new();
    lookups_from(&mut users, &directory);
    users
        .expect_list_by_status()
        .times(1)
        .returning(|_| Err(unavailable()));
    let (dispatcher, gateway) = wire(users);

    texts(&dispatcher, root.id(), &["Users", "Edit", "Approve"]).await;

    let notice = gateway
        .last_for(root.id().value())
        .ok_or_else(|| eyre::eyre!("no reply for the admin"))?;
    assert_eq!(
        notice.text,
        "Something went wrong while taking approving list :("
    );
    let current = session(&dispatcher, root.id()).await;
    assert_eq!(current.node(), MenuNode::UsersEdit);
    assert!(current.slider().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_admin_lookup_still_confirms_the_request() -> eyre::Result<()> {
    let root = admin()?;
    let directory = Directory::with(&[root.clone()]);
    let mut users = MockUsers::new();
    lookups_from(&mut users, &directory);
    let records = directory.clone();
    users.expect_store().times(1).returning(move |user| {
        records.put(user);
        Ok(())
    });
    users
        .expect_list_admins()
        .times(1)
        .returning(|| Err(unavailable()));
    let (dispatcher, gateway) = wire(users);
    let eve = UserId::new(7)?;
    let press = || {
        InboundEvent::callback(eve, "NewUserRequest")
            .with_sender(DisplayName::new("Eve", "Stone"))
            .with_context(ConversationContext {
                chat_id: eve.value(),
                message_id: None,
            })
    };

    dispatcher.handle(press()).await;
    dispatcher.handle(press()).await;

    assert_eq!(
        directory.get(eve)?.map(|user| user.status()),
        Some(UserStatus::Requested)
    );
    assert_eq!(
        gateway.texts_for(eve.value()),
        vec![
            "Your request has been sent.\nKeep calm and wait for approval message!".to_owned(),
            "You have already made request".to_owned(),
        ]
    );
    assert!(gateway.texts_for(root.id().value()).is_empty());
    Ok(())
}
