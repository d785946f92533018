//! crates/chefsync_core/src/directory.rs
//!
//! The durable profile collection: every user, their pantry, and their
//! adopted plans. Hydrated once from a [`ProfileStore`] and flushed back
//! after every mutation, so the persisted blob always matches what readers
//! can observe.
//!
//! Plans are logically keyed by (date, meal type) per user. Every mutation
//! runs under the write lock and re-establishes that uniqueness before the
//! lock drops, so no reader ever sees a duplicate slot, even momentarily.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{CookingPlan, MealType, Pantry, UserProfile};
use crate::ports::{PortError, PortResult, ProfileStore};

/// In-memory view of all profiles, backed by the injected store.
pub struct ProfileDirectory {
    store: Arc<dyn ProfileStore>,
    profiles: RwLock<Vec<UserProfile>>,
}

impl ProfileDirectory {
    /// Hydrates the directory from the store. Called once per process.
    pub async fn load(store: Arc<dyn ProfileStore>) -> PortResult<Self> {
        let profiles = store.load_all().await?;
        debug!(count = profiles.len(), "profile directory hydrated");
        Ok(Self {
            store,
            profiles: RwLock::new(profiles),
        })
    }

    //=====================================================================================
    // Profile operations
    //=====================================================================================

    pub async fn add_profile(&self, profile: UserProfile) -> PortResult<()> {
        let mut profiles = self.profiles.write().await;
        debug!(user_id = %profile.id, name = %profile.name, "profile created");
        profiles.push(profile);
        self.store.save_all(&profiles).await
    }

    /// Applies a field-level edit to one profile (onboarding steps, settings
    /// changes) and flushes.
    pub async fn update_profile<F>(&self, user_id: Uuid, edit: F) -> PortResult<()>
    where
        F: FnOnce(&mut UserProfile),
    {
        let mut profiles = self.profiles.write().await;
        let profile = find_mut(&mut profiles, user_id)?;
        edit(profile);
        self.store.save_all(&profiles).await
    }

    pub async fn update_pantry(&self, user_id: Uuid, pantry: Pantry) -> PortResult<()> {
        self.update_profile(user_id, |profile| profile.pantry = pantry)
            .await
    }

    pub async fn get(&self, user_id: Uuid) -> Option<UserProfile> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|profile| profile.id == user_id)
            .cloned()
    }

    /// Snapshot of every profile, for read-only consumers like diagnostics.
    pub async fn profiles(&self) -> Vec<UserProfile> {
        self.profiles.read().await.clone()
    }

    //=====================================================================================
    // Plan operations
    //=====================================================================================

    /// Inserts one plan, replacing any existing plan for the same
    /// (date, meal type) slot. The new plan lands at the front of the
    /// collection for the "recently adopted" view.
    pub async fn add_plan(&self, user_id: Uuid, plan: CookingPlan) -> PortResult<()> {
        let mut profiles = self.profiles.write().await;
        let profile = find_mut(&mut profiles, user_id)?;
        profile.plans.retain(|existing| {
            existing.metadata.date != plan.metadata.date
                || existing.metadata.meal_type != plan.metadata.meal_type
        });
        debug!(user_id = %user_id, recipe = %plan.recipe_name, date = %plan.metadata.date, "meal planned");
        profile.plans.insert(0, plan);
        self.store.save_all(&profiles).await
    }

    /// Inserts a whole batch in one logical step: every existing plan whose
    /// slot collides with the batch is removed, then the batch is prepended
    /// ahead of the survivors.
    pub async fn add_batch_plans(
        &self,
        user_id: Uuid,
        plans: Vec<CookingPlan>,
    ) -> PortResult<()> {
        let mut profiles = self.profiles.write().await;
        let profile = find_mut(&mut profiles, user_id)?;

        {
            let incoming: HashSet<(&str, MealType)> = plans
                .iter()
                .map(|plan| (plan.metadata.date.as_str(), plan.metadata.meal_type))
                .collect();
            profile.plans.retain(|existing| {
                !incoming.contains(&(existing.metadata.date.as_str(), existing.metadata.meal_type))
            });
        }

        debug!(user_id = %user_id, count = plans.len(), "schedule committed");
        let survivors = std::mem::take(&mut profile.plans);
        profile.plans = plans;
        profile.plans.extend(survivors);
        self.store.save_all(&profiles).await
    }

    /// Plans for one user on one calendar date. Pure projection.
    pub async fn plans_on_date(&self, user_id: Uuid, date: &str) -> Vec<CookingPlan> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|profile| profile.id == user_id)
            .map(|profile| {
                profile
                    .plans
                    .iter()
                    .filter(|plan| plan.metadata.date == date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Up to `limit` plans for one user, most recent date first. Dates are
    /// ISO strings, so lexicographic order is chronological order.
    pub async fn recent_plans(&self, user_id: Uuid, limit: usize) -> Vec<CookingPlan> {
        self.profiles
            .read()
            .await
            .iter()
            .find(|profile| profile.id == user_id)
            .map(|profile| {
                let mut plans = profile.plans.clone();
                plans.sort_by(|a, b| b.metadata.date.cmp(&a.metadata.date));
                plans.truncate(limit);
                plans
            })
            .unwrap_or_default()
    }
}

fn find_mut(profiles: &mut [UserProfile], user_id: Uuid) -> PortResult<&mut UserProfile> {
    profiles
        .iter_mut()
        .find(|profile| profile.id == user_id)
        .ok_or_else(|| PortError::Unexpected(format!("unknown profile {user_id}")))
}
