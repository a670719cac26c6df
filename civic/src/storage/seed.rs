//! Built-in demonstration dataset.

use crate::types::*;
use chrono::{DateTime, TimeZone, Utc};

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "Aarnav Jaiswal".to_string(),
            email: "aarnavj@gmail.com".to_string(),
            role: Role::Citizen,
            department: None,
        },
        User {
            id: "2".to_string(),
            name: "Navya Garg".to_string(),
            email: "Navya@admin.gov".to_string(),
            role: Role::Admin,
            department: None,
        },
        User {
            id: "3".to_string(),
            name: "Aalekh Chaudhary".to_string(),
            email: "Aalekh@PWD.gov".to_string(),
            role: Role::Staff,
            department: Some("Public Works".to_string()),
        },
    ]
}

pub fn departments() -> Vec<Department> {
    vec![
        Department {
            id: "1".to_string(),
            name: "Public Works".to_string(),
            categories: vec![Category::Pothole, Category::Sidewalk, Category::Streetlight],
        },
        Department {
            id: "2".to_string(),
            name: "Sanitation".to_string(),
            categories: vec![Category::Trash],
        },
        Department {
            id: "3".to_string(),
            name: "Transportation".to_string(),
            categories: vec![Category::Traffic],
        },
        Department {
            id: "4".to_string(),
            name: "Utilities".to_string(),
            categories: vec![Category::Water],
        },
    ]
}

pub fn issues() -> Vec<Issue> {
    let users = users();
    let citizen = Reporter::from(&users[0]);
    let staff = Assignee {
        id: users[2].id.clone(),
        name: users[2].name.clone(),
        department: users[2].department.clone().unwrap_or_default(),
    };

    vec![
        Issue {
            id: "1".to_string(),
            title: "Large pothole on Main Street".to_string(),
            description: "Deep pothole causing damage to vehicles near the intersection".to_string(),
            category: Category::Pothole,
            priority: Priority::High,
            status: Status::Reported,
            location: Location {
                lat: 40.7128,
                lng: -74.006,
                address: "Meerut Rd, Ghaziabad, Uttar Pradesh 201206".to_string(),
            },
            image_url: Some("/street-pothole.png".to_string()),
            reported_by: citizen.clone(),
            assigned_to: None,
            created_at: at(2025, 1, 15, 10, 30),
            updated_at: at(2025, 3, 15, 10, 30),
            resolved_at: None,
        },
        Issue {
            id: "2".to_string(),
            title: "Broken streetlight".to_string(),
            description: "Streetlight has been out for several days, creating safety concerns".to_string(),
            category: Category::Streetlight,
            priority: Priority::Medium,
            status: Status::InProgress,
            location: Location {
                lat: 40.7589,
                lng: -73.9851,
                address: "Sector Delta-1, Greater Noida".to_string(),
            },
            image_url: Some("/broken-streetlight-night.png".to_string()),
            reported_by: citizen.clone(),
            assigned_to: Some(staff.clone()),
            created_at: at(2025, 4, 14, 14, 20),
            updated_at: at(2025, 5, 15, 9, 15),
            resolved_at: None,
        },
        Issue {
            id: "3".to_string(),
            title: "Overflowing trash bin".to_string(),
            description: "Trash bin at bus stop is overflowing, attracting pests".to_string(),
            category: Category::Trash,
            priority: Priority::Medium,
            status: Status::Resolved,
            location: Location {
                lat: 40.7505,
                lng: -73.9934,
                address: "Sangam Vihar, New Delhi".to_string(),
            },
            image_url: Some("/overflowing-public-trash-bin.jpg".to_string()),
            reported_by: citizen,
            assigned_to: Some(staff),
            created_at: at(2025, 3, 13, 16, 45),
            updated_at: at(2025, 6, 14, 11, 30),
            resolved_at: Some(at(2025, 7, 14, 11, 30)),
        },
    ]
}
