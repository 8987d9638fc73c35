use twilight_http::Client;
use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    guild::Permissions,
    id::{
        Id,
        marker::{GuildMarker, RoleMarker},
    },
};

/// Fold the `@everyone` role and the member's roles into one permission set.
///
/// `roles` yields every guild role as `(id, permissions)`.
pub fn effective_permissions(
    guild_id: Id<GuildMarker>,
    member_roles: &[Id<RoleMarker>],
    roles: impl IntoIterator<Item = (Id<RoleMarker>, Permissions)>,
) -> Permissions {
    roles
        .into_iter()
        .filter(|(id, _)| *id == guild_id.cast() || member_roles.contains(id))
        .fold(Permissions::empty(), |resolved, (_, permissions)| {
            resolved | permissions
        })
}

/// `ADMINISTRATOR` implies every other permission.
pub fn permits(perms: Permissions, required: Permissions) -> bool {
    perms.contains(Permissions::ADMINISTRATOR) || perms.contains(required)
}

/// Resolve the invoking author's effective guild permissions for a message command.
///
/// Returns `Ok(None)` when the message is not from a guild context.
pub async fn resolve_message_author_permissions(
    http: &Client,
    msg: &MessageCreate,
) -> anyhow::Result<Option<Permissions>> {
    if let Some(perms) = msg.member.as_ref().and_then(|m| m.permissions) {
        return Ok(Some(perms));
    }

    let Some(guild_id) = msg.guild_id else {
        return Ok(None);
    };

    let member = http
        .guild_member(guild_id, msg.author.id)
        .await?
        .model()
        .await?;
    let roles = http.roles(guild_id).await?.model().await?;

    Ok(Some(effective_permissions(
        guild_id,
        &member.roles,
        roles.iter().map(|role| (role.id, role.permissions)),
    )))
}

/// Check whether the message author has a required permission.
///
/// Returns `Ok(false)` when the message is outside a guild context.
pub async fn has_message_permission(
    http: &Client,
    msg: &MessageCreate,
    required: Permissions,
) -> anyhow::Result<bool> {
    let Some(perms) = resolve_message_author_permissions(http, msg).await? else {
        return Ok(false);
    };

    Ok(permits(perms, required))
}
