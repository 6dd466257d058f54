//! Seed rows and seeding configuration.

use chrono::{NaiveDate, NaiveTime};
use creche_models::{ActivityType, PlanDuration};
use uuid::Uuid;

pub struct AccountSeed {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub contact: String,
    pub address: String,
}

pub struct NurserySeed {
    pub manager_id: Uuid,
    pub name: String,
    pub address: String,
    pub contact_number: String,
    pub information: String,
    pub max_age: i32,
    pub max_children_per_class: i32,
}

pub struct OpeningHourSeed {
    pub nursery_id: Uuid,
    pub day: i16,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

pub struct ClassroomSeed {
    pub nursery_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub age_range_start: i32,
    pub age_range_end: i32,
}

pub struct GroupSeed {
    pub classroom_id: Uuid,
    pub name: String,
}

pub struct ActivitySeed {
    pub nursery_id: Uuid,
    pub name: String,
    pub description: String,
    pub activity_type: ActivityType,
}

pub struct PlanSeed {
    pub nursery_id: Uuid,
    pub name: String,
    pub price: i64,
    pub duration: PlanDuration,
}

pub struct ChildSeed {
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
}

/// What to create for each nursery.
#[derive(Clone)]
pub struct PerNursery {
    pub classrooms: usize,
    pub groups_per_classroom: usize,
    pub activities: usize,
    pub parents: usize,
    pub children_per_parent: usize,
}

impl Default for PerNursery {
    fn default() -> Self {
        Self {
            classrooms: 3,
            groups_per_classroom: 2,
            activities: 5,
            parents: 10,
            children_per_parent: 2,
        }
    }
}

#[derive(Clone, Default)]
pub struct SeedConfig {
    pub num_nurseries: usize,
    pub per_nursery: PerNursery,
}

impl SeedConfig {
    pub fn new(num_nurseries: usize) -> Self {
        Self {
            num_nurseries,
            ..Default::default()
        }
    }

    pub fn with_per_nursery(mut self, per_nursery: PerNursery) -> Self {
        self.per_nursery = per_nursery;
        self
    }

    pub fn total_parents(&self) -> usize {
        self.num_nurseries * self.per_nursery.parents
    }

    pub fn total_children(&self) -> usize {
        self.total_parents() * self.per_nursery.children_per_parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let config = SeedConfig::new(4).with_per_nursery(PerNursery {
            parents: 5,
            children_per_parent: 3,
            ..Default::default()
        });
        assert_eq!(config.total_parents(), 20);
        assert_eq!(config.total_children(), 60);
    }
}
