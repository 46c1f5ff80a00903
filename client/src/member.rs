use std::{fmt, sync::Arc};

use tether_shared::{
    CachedEntity, ChangeSet, EntityContext, EntityId, EntityKind, Field, FieldError, FormatRule,
    MinLengthRule, NonEmptyRule, ProxyBase, RawData, Registry, RegistryError, SubscriptionHandle,
    SymbolMap, SyncError,
};

/// A member's online status as reported by the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberStatus {
    Disconnected,
    Idle,
    Active,
    /// Wire tokens this client does not recognize degrade here.
    Unknown,
}

fn status_map() -> SymbolMap<MemberStatus> {
    SymbolMap::new(
        MemberStatus::Unknown,
        &[
            (MemberStatus::Disconnected, "disconnected"),
            (MemberStatus::Idle, "idle"),
            (MemberStatus::Active, "active"),
        ],
    )
    .expect("member status pairs are bijective")
}

fn username_format(value: &str) -> bool {
    value.chars().count() >= 3
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn initials_format(value: &str) -> bool {
    let count = value.chars().count();
    (1..=4).contains(&count) && value.chars().all(char::is_alphabetic)
}

// Member
/// A member of the remote service.
pub struct Member {
    base: ProxyBase,
    username: Field<String>,
    full_name: Field<String>,
    initials: Field<String>,
    bio: Field<String>,
    url: Field<String>,
    avatar_hash: Field<String>,
    confirmed: Field<bool>,
    status: Field<MemberStatus>,
    trophies: Field<Vec<String>>,
}

impl Member {
    /// The canonical instance for `id`, constructed and cached on first use.
    pub fn find_or_create(registry: &Registry, id: &EntityId) -> Result<Arc<Self>, RegistryError> {
        registry
            .cache()
            .find_or_create(id, || Self::build(registry, id))
    }

    fn build(registry: &Registry, id: &EntityId) -> Result<Arc<Self>, RegistryError> {
        let context = registry.context_for::<Self>(id)?;
        let base = ProxyBase::new(
            EntityKind::of::<Self>(),
            id.clone(),
            context.clone(),
            registry.cache().clone(),
        );
        Ok(Arc::new(Self {
            username: Field::new(context.clone(), "username").add_rule(FormatRule::new(
                "at least 3 lowercase letters, digits or underscores",
                username_format,
            )),
            full_name: Field::new(context.clone(), "fullName")
                .add_rule(NonEmptyRule)
                .add_rule(MinLengthRule::new(4)),
            initials: Field::new(context.clone(), "initials")
                .add_rule(FormatRule::new("1 to 4 letters", initials_format)),
            bio: Field::new(context.clone(), "bio"),
            url: Field::new(context.clone(), "url"),
            avatar_hash: Field::new(context.clone(), "avatarHash"),
            confirmed: Field::new(context.clone(), "confirmed"),
            status: Field::with_symbols(context.clone(), "status", status_map()),
            trophies: Field::new(context, "trophies"),
            base,
        }))
    }

    pub fn id(&self) -> &EntityId {
        self.base.id()
    }

    pub fn username(&self) -> Result<Option<String>, FieldError> {
        self.username.get()
    }

    pub fn set_username(&self, username: impl Into<String>) -> Result<(), FieldError> {
        self.username.set(username.into())
    }

    pub fn full_name(&self) -> Result<Option<String>, FieldError> {
        self.full_name.get()
    }

    pub fn set_full_name(&self, full_name: impl Into<String>) -> Result<(), FieldError> {
        self.full_name.set(full_name.into())
    }

    pub fn initials(&self) -> Result<Option<String>, FieldError> {
        self.initials.get()
    }

    pub fn set_initials(&self, initials: impl Into<String>) -> Result<(), FieldError> {
        self.initials.set(initials.into())
    }

    pub fn bio(&self) -> Result<Option<String>, FieldError> {
        self.bio.get()
    }

    pub fn set_bio(&self, bio: impl Into<String>) -> Result<(), FieldError> {
        self.bio.set(bio.into())
    }

    /// The member's profile URL. Maintained by the remote; read-only here.
    pub fn url(&self) -> Result<Option<String>, FieldError> {
        self.url.get()
    }

    /// Whether the member has actually joined, or has merely been invited.
    pub fn confirmed(&self) -> Result<Option<bool>, FieldError> {
        self.confirmed.get()
    }

    pub fn status(&self) -> Result<Option<MemberStatus>, FieldError> {
        self.status.get()
    }

    pub fn trophies(&self) -> Result<Option<Vec<String>>, FieldError> {
        self.trophies.get()
    }

    /// The avatar CDN URL derived from the member's avatar hash; `None`
    /// when no avatar was uploaded.
    pub fn avatar_url(&self) -> Result<Option<String>, FieldError> {
        let hash = self.avatar_hash.get()?;
        Ok(hash.and_then(|hash| {
            if hash.trim().is_empty() {
                None
            } else {
                Some(format!("https://avatars.tether.dev/{hash}/170.png"))
            }
        }))
    }

    /// Fetches a full snapshot now, regardless of the expiry window.
    pub fn refresh(&self) -> Result<(), SyncError> {
        self.base.refresh()
    }

    /// Deletes the member remotely and evicts this instance from the cache.
    pub fn delete(&self) -> Result<(), SyncError> {
        self.base.delete()
    }

    /// Applies partial data carried by an event concerning this member.
    pub fn apply_event(&self, partial: &RawData) {
        self.base.context().merge(partial, false);
    }

    /// Invokes `listener` with the Change Set after every merge.
    pub fn on_updated(
        &self,
        listener: impl Fn(&ChangeSet) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.base.context().subscribe(Arc::new(listener))
    }

    pub fn remove_updated(&self, handle: SubscriptionHandle) -> bool {
        self.base.context().unsubscribe(handle)
    }
}

impl CachedEntity for Member {
    fn context(&self) -> &Arc<EntityContext> {
        self.base.context()
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl Eq for Member {}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.full_name.local() {
            Ok(Some(full_name)) => write!(f, "{full_name}"),
            _ => write!(f, "{}", self.base.id()),
        }
    }
}
