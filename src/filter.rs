use crate::api::models::{Job, UserId};

/// Narrowing applied to the job listing. An empty filter keeps every job.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub locations: Vec<String>,
    pub employment_type: Option<String>,
    pub company_id: Option<UserId>,
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            let needle = keyword.to_lowercase();
            let hit = [&job.title, &job.description, &job.requirements, &job.benefits]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if !self.locations.is_empty() && !self.locations.iter().any(|l| l == &job.location) {
            return false;
        }
        if let Some(kind) = &self.employment_type {
            if kind != &job.employment_type {
                return false;
            }
        }
        match self.company_id {
            Some(id) => job.company_id == Some(id),
            None => true,
        }
    }

    pub fn apply<'a>(&self, jobs: &'a [Job]) -> Vec<&'a Job> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }
}
