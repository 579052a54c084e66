//! Message bodies rendered with `minijinja`.

use super::ports::{RenderError, RenderResult};
use crate::task::domain::{HistoryEntry, Task};
use crate::user::domain::{DisplayName, User, UserId};
use chrono::{DateTime, Utc};
use minijinja::{Environment, Value, context};
use std::collections::HashMap;

const TASK_CARD: &str = "\
Task #{{ id }}
Status: {{ status }} ({{ changed_at }})
Title: {{ title }}
Description: {{ description }}
{%- if comment %}
Comment: {{ comment }} ({{ commented_at }})
{%- endif %}
{%- if attachments %}
Attachments: {{ attachments | join(\", \") }}
{%- endif %}";

const HISTORY: &str = "\
Task #{{ id }}
Title: {{ title }}
{%- for entry in entries %}
{{ loop.index }}. {{ entry.status }} by {{ entry.actor }} at {{ entry.changed_at }}
{%- if entry.comment %} | Comment: {{ entry.comment }}{% endif %}
{%- endfor %}";

const USER_LISTING: &str = "\
We have {{ users | length }} {{ label }} users:
{%- for user in users %}
{{ loop.index }}. {{ user.name }} (id {{ user.id }})
{%- endfor %}";

const MODERATION_CARD: &str = "\
{{ position }}/{{ total }}
{{ name }} (id {{ id }})
Status: {{ status }} since {{ changed_at }}";

const ACCESS_REQUEST: &str = "\
{{ name }} (id {{ id }}) asks for access.
Accept the request?";

fn render(name: &'static str, template: &str, ctx: Value) -> RenderResult<String> {
    let environment = Environment::new();
    environment
        .render_str(template, ctx)
        .map_err(|error| RenderError::Template {
            template: name,
            reason: error.to_string(),
        })
}

/// Formats a timestamp the way every message shows it.
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Renders the card of one task.
///
/// # Errors
///
/// Returns [`RenderError::Template`] when rendering fails.
pub fn task_card(task: &Task) -> RenderResult<String> {
    let comment = task.comment();
    render(
        "task_card",
        TASK_CARD,
        context! {
            id => task.id().value(),
            status => task.status().label(),
            changed_at => timestamp(task.changed_at()),
            title => task.title(),
            description => task.description(),
            comment => comment.map(|latest| latest.text.clone()),
            commented_at => comment.map(|latest| timestamp(latest.commented_at)),
            attachments => task.attachments(),
        },
    )
}

/// Renders the audit history of a task, naming each actor.
///
/// Actors missing from `actors` are shown by identity.
///
/// # Errors
///
/// Returns [`RenderError::Template`] when rendering fails.
pub fn history(
    task: &Task,
    entries: &[HistoryEntry],
    actors: &HashMap<UserId, DisplayName>,
) -> RenderResult<String> {
    let rows: Vec<Value> = entries
        .iter()
        .map(|entry| {
            let actor = actors.get(&entry.changed_by).map_or_else(
                || format!("user {}", entry.changed_by),
                ToString::to_string,
            );
            context! {
                changed_at => timestamp(entry.changed_at),
                status => entry.status.label(),
                actor => actor,
                comment => entry.comment.clone(),
            }
        })
        .collect();
    render(
        "history",
        HISTORY,
        context! { id => task.id().value(), title => task.title(), entries => rows },
    )
}

/// Renders a Users→View listing.
///
/// # Errors
///
/// Returns [`RenderError::Template`] when rendering fails.
pub fn user_listing(label: &str, users: &[User]) -> RenderResult<String> {
    let rows: Vec<Value> = users
        .iter()
        .map(|user| context! { name => user.name().to_string(), id => user.id().value() })
        .collect();
    render(
        "user_listing",
        USER_LISTING,
        context! { label => label, users => rows },
    )
}

/// Renders the moderation card of the user under the cursor.
///
/// # Errors
///
/// Returns [`RenderError::Template`] when rendering fails.
pub fn moderation_card(user: &User, position: usize, total: usize) -> RenderResult<String> {
    render(
        "moderation_card",
        MODERATION_CARD,
        context! {
            position => position,
            total => total,
            name => user.name().to_string(),
            id => user.id().value(),
            status => user.status().label(),
            changed_at => timestamp(user.changed_at()),
        },
    )
}

/// Renders the notice sent to admins for a new access request.
///
/// # Errors
///
/// Returns [`RenderError::Template`] when rendering fails.
pub fn access_request(user: &User) -> RenderResult<String> {
    render(
        "access_request",
        ACCESS_REQUEST,
        context! { name => user.name().to_string(), id => user.id().value() },
    )
}
