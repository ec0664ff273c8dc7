use std::fmt::Write;

use crate::api::models::{Job, Profile, User};

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() { "-" } else { value }
}

pub fn render_jobs(jobs: &[&Job]) -> String {
    let mut out = String::from("Jobs\n");
    if jobs.is_empty() {
        out.push_str("  (no matching jobs)\n");
    }
    for job in jobs {
        let _ = writeln!(out, "  #{} {}", job.id, job.title);
        let _ = writeln!(
            out,
            "      {} | {} | {}",
            or_dash(&job.location),
            salary(job.salary),
            or_dash(&job.employment_type)
        );
    }
    out
}

fn salary(value: Option<i64>) -> String {
    value.map(|s| s.to_string()).unwrap_or_else(|| "salary n/a".to_string())
}

pub fn render_job(job: &Job) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", job.id, job.title);
    let _ = writeln!(out, "Location:        {}", or_dash(&job.location));
    let _ = writeln!(out, "Salary:          {}", salary(job.salary));
    let _ = writeln!(out, "Employment type: {}", or_dash(&job.employment_type));
    let _ = writeln!(out, "\n{}\n", or_dash(&job.description));
    let _ = writeln!(out, "Requirements: {}", or_dash(&job.requirements));
    let _ = writeln!(out, "Benefits:     {}", or_dash(&job.benefits));
    out
}

pub fn render_users(users: &[User]) -> String {
    let mut out = String::from("Users\n");
    for user in users {
        let _ = writeln!(out, "  #{} {} ({})", user.id, user.name, user.user_type.label());
    }
    out
}

pub fn render_user(user: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", user.id, user.name);
    let _ = writeln!(out, "Email:     {}", or_dash(&user.email));
    let _ = writeln!(out, "User type: {}", user.user_type.label());
    if let Some(profile) = &user.profile {
        out.push('\n');
        out.push_str(&render_profile(profile));
    }
    out
}

pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Introduction: {}", or_dash(&profile.introduction));
    let _ = writeln!(out, "Skills:       {}", or_dash(&profile.skills));
    let _ = writeln!(out, "Company:      {}", or_dash(&profile.company_name));
    let _ = writeln!(out, "Industry:     {}", or_dash(&profile.industry));
    if let Some(icon) = &profile.user_icon_url {
        let _ = writeln!(out, "Icon:         {}", icon);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::UserType;

    #[test]
    fn job_rows_show_missing_fields() {
        let job = Job {
            id: 4,
            title: "Data Analyst".into(),
            description: String::new(),
            location: String::new(),
            salary: Some(300000),
            requirements: "SQL".into(),
            benefits: String::new(),
            employment_type: "full-time".into(),
            company_id: None,
        };
        let list = render_jobs(&[&job]);
        assert!(list.contains("#4 Data Analyst"));
        assert!(list.contains("- | 300000 | full-time"));
        assert!(render_job(&job).contains("Benefits:     -"));
        assert!(render_jobs(&[]).contains("no matching jobs"));
    }

    #[test]
    fn users_show_type_labels() {
        let user = User {
            id: 1,
            name: "Ren".into(),
            email: "ren@example.com".into(),
            user_type: UserType::Student,
            profile: Some(Profile {
                skills: "Rust, SQL".into(),
                ..Profile::default()
            }),
        };
        assert!(render_users(std::slice::from_ref(&user)).contains("#1 Ren (Student)"));
        let detail = render_user(&user);
        assert!(detail.contains("User type: Student"));
        assert!(detail.contains("Skills:       Rust, SQL"));
    }
}
