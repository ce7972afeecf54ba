// SPDX-FileCopyrightText: 2026 Deskflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for catalog records used across tests.

use deskflow_core::{Actor, Department, DepartmentId, HelpTopic, HelpTopicId, Role, User, UserId};

pub fn user(id: &str, role: Role, departments: &[&str]) -> User {
    User {
        id: UserId::from(id),
        first_name: id.to_string(),
        last_name: "Tester".to_string(),
        email: format!("{id}@example.com"),
        role,
        departments: departments.iter().map(|d| DepartmentId::from(*d)).collect(),
    }
}

pub fn author(id: &str) -> User {
    user(id, Role::User, &[])
}

pub fn agent(id: &str, departments: &[&str]) -> User {
    user(id, Role::Agent, departments)
}

pub fn admin(id: &str) -> User {
    user(id, Role::Admin, &[])
}

pub fn department(id: &str, name: &str) -> Department {
    Department {
        id: DepartmentId::from(id),
        name: name.to_string(),
    }
}

pub fn help_topic(id: &str, department: &str, classification: i64) -> HelpTopic {
    HelpTopic {
        id: HelpTopicId::from(id),
        name: id.to_string(),
        department: DepartmentId::from(department),
        classification,
        enabled: true,
        examples: Vec::new(),
    }
}

/// The acting identity for `user`.
pub fn actor(user: &User) -> Actor {
    Actor::new(user.id.clone(), user.role)
}
