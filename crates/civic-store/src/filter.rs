use civic_types::api::ComplaintQuery;
use civic_types::models::{Complaint, StatusType, UnknownStatus};

/// Criteria for complaint listings. Every `None` criterion matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub status: Option<StatusType>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub search: Option<String>,
    pub citizen_email: Option<String>,
}

/// Empty input and the literal "all" both disable a criterion.
fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl ComplaintFilter {
    pub fn from_query(query: &ComplaintQuery) -> Result<Self, UnknownStatus> {
        let status = active(query.status.as_deref())
            .map(str::parse::<StatusType>)
            .transpose()?;

        Ok(Self {
            status,
            category: active(query.category.as_deref()).map(String::from),
            department: active(query.department.as_deref()).map(String::from),
            search: query.search.clone().filter(|s| !s.is_empty()),
            citizen_email: active(query.email.as_deref()).map(String::from),
        })
    }

    pub fn status(mut self, status: StatusType) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn citizen_email(mut self, email: impl Into<String>) -> Self {
        self.citizen_email = Some(email.into());
        self
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(status) = self.status {
            if complaint.status != status {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &complaint.category != category {
                return false;
            }
        }

        if let Some(department) = &self.department {
            if complaint.department_assigned.as_ref() != Some(department) {
                return false;
            }
        }

        if let Some(email) = &self.citizen_email {
            if !same_email(&complaint.citizen_email, email) {
                return false;
            }
        }

        match &self.search {
            Some(term) => matches_text(complaint, &term.to_lowercase()),
            None => true,
        }
    }

    /// Matching complaints, newest first.
    pub fn apply<'a, I>(&self, complaints: I) -> Vec<Complaint>
    where
        I: IntoIterator<Item = &'a Complaint>,
    {
        let mut out: Vec<Complaint> = complaints
            .into_iter()
            .filter(|c| self.matches(c))
            .cloned()
            .collect();
        sort_newest_first(&mut out);
        out
    }
}

/// Unicode case-insensitive email comparison.
pub(crate) fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn matches_text(complaint: &Complaint, term: &str) -> bool {
    [
        &complaint.title,
        &complaint.description,
        &complaint.location,
        &complaint.citizen_name,
        &complaint.citizen_email,
        &complaint.category,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}

fn sort_newest_first(complaints: &mut [Complaint]) {
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
