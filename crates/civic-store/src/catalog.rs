//! Fixed category and department lists, plus the complaints a fresh store
//! starts with.

use chrono::{DateTime, Duration, Utc};

use civic_types::models::{Complaint, Response, StatusType};

pub const CATEGORIES: [&str; 11] = [
    "Roads & Infrastructure",
    "Utilities",
    "Sanitation",
    "Public Safety",
    "Parks & Recreation",
    "Public Transport",
    "Noise Complaint",
    "Building & Zoning",
    "Environmental Concerns",
    "Animal Control",
    "Other",
];

pub const DEPARTMENTS: [&str; 10] = [
    "Public Works",
    "Waste Management",
    "Transportation Department",
    "Parks Department",
    "Public Safety",
    "Utility Services",
    "Health Department",
    "Environmental Protection",
    "Building & Zoning",
    "Social Services",
];

pub fn is_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}

pub fn is_department(name: &str) -> bool {
    DEPARTMENTS.contains(&name)
}

fn ago(now: DateTime<Utc>, millis: i64) -> DateTime<Utc> {
    now - Duration::milliseconds(millis)
}

/// Sample complaints, timestamped relative to `now`.
pub fn initial_complaints(now: DateTime<Utc>) -> Vec<Complaint> {
    vec![
        Complaint {
            id: "c1".into(),
            title: "Pothole on Main Street".into(),
            description: "Large pothole causing traffic delays and potential vehicle damage at intersection of Main St and 5th Ave.".into(),
            category: "Roads & Infrastructure".into(),
            location: "Main Street & 5th Avenue".into(),
            citizen_name: "Jane Smith".into(),
            citizen_email: "jane@example.com".into(),
            citizen_phone: None,
            status: StatusType::InProgress,
            department_assigned: Some("Public Works".into()),
            assigned_to: None,
            created_at: ago(now, 864_000_000),
            updated_at: ago(now, 432_000_000),
            responses: vec![Response {
                id: "r1".into(),
                text: "Thank you for reporting. We've dispatched a crew to assess the damage.".into(),
                created_at: ago(now, 600_000_000),
                is_admin: true,
                user_name: "Public Works Dept".into(),
            }],
        },
        Complaint {
            id: "c2".into(),
            title: "Street Light Outage".into(),
            description: "Multiple street lights are not working on Park Avenue, creating safety concerns for pedestrians at night.".into(),
            category: "Utilities".into(),
            location: "Park Avenue between 10th and 12th St".into(),
            citizen_name: "John Doe".into(),
            citizen_email: "john@example.com".into(),
            citizen_phone: None,
            status: StatusType::New,
            department_assigned: None,
            assigned_to: None,
            created_at: ago(now, 172_800_000),
            updated_at: ago(now, 172_800_000),
            responses: vec![],
        },
        Complaint {
            id: "c3".into(),
            title: "Overflowing Trash Cans".into(),
            description: "Trash cans at Central Park haven't been emptied for several days and are now overflowing, attracting pests.".into(),
            category: "Sanitation".into(),
            location: "Central Park, South Entrance".into(),
            citizen_name: "Sarah Johnson".into(),
            citizen_email: "sarah@example.com".into(),
            citizen_phone: None,
            status: StatusType::Resolved,
            department_assigned: Some("Waste Management".into()),
            assigned_to: None,
            created_at: ago(now, 1_080_000_000),
            updated_at: ago(now, 345_600_000),
            responses: vec![
                Response {
                    id: "r2".into(),
                    text: "Our team has been notified and will address this issue within 24 hours.".into(),
                    created_at: ago(now, 950_000_000),
                    is_admin: true,
                    user_name: "Waste Management Dept".into(),
                },
                Response {
                    id: "r3".into(),
                    text: "The trash cans have been emptied and the area has been cleaned. We've also increased collection frequency for this location.".into(),
                    created_at: ago(now, 345_600_000),
                    is_admin: true,
                    user_name: "Waste Management Dept".into(),
                },
            ],
        },
    ]
}
