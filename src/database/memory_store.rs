use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CompanyStats, EntityStore, PlatformStats};
use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::models::candidate::{Candidate, CandidateFields, CandidateProfile, CandidateSkill};
use crate::models::catalog::{Area, Skill};
use crate::models::company::{Company, CompanyFields};
use crate::models::job::{Job, JobChanges, JobDetails, JobSkill, NewJob, NewJobSkill};
use crate::models::resume::{
    Certification, Education, Experience, Language, Project, Resume, ResumeEntry, ResumeRecord,
    ResumeSection,
};
use crate::models::user::{NewUser, Role, User};
use crate::services::candidate_filter::CandidateFilter;
use crate::services::job_filter::{JobFilter, JobSort};
use crate::utils::pagination::{Page, PageRequest};
use crate::utils::time::now;

const DEFAULT_CURRENCY: &str = "BRL";

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    candidates: BTreeMap<i64, Candidate>,
    candidate_skills: Vec<CandidateSkill>,
    companies: BTreeMap<i64, Company>,
    jobs: BTreeMap<i64, Job>,
    job_skills: Vec<JobSkill>,
    skills: BTreeMap<i64, Skill>,
    areas: BTreeMap<i64, Area>,
    applications: BTreeMap<i64, Application>,
    experiences: BTreeMap<i64, Experience>,
    educations: BTreeMap<i64, Education>,
    certifications: BTreeMap<i64, Certification>,
    projects: BTreeMap<i64, Project>,
    languages: BTreeMap<i64, Language>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn candidate_profile(&self, candidate: Candidate) -> CandidateProfile {
        let skills = self
            .candidate_skills
            .iter()
            .filter(|s| s.candidate_id == candidate.id)
            .cloned()
            .collect();
        CandidateProfile { candidate, skills }
    }

    fn job_details(&self, job: Job) -> JobDetails {
        let skills = self
            .job_skills
            .iter()
            .filter(|s| s.job_id == job.id)
            .cloned()
            .collect();
        JobDetails { job, skills }
    }

    fn ensure_skills(&self, ids: impl IntoIterator<Item = i64>) -> Result<()> {
        let mut seen = HashSet::new();
        for id in ids {
            if !self.skills.contains_key(&id) {
                return Err(Error::NotFound(format!("Skill {} not found", id)));
            }
            if !seen.insert(id) {
                return Err(Error::Conflict(format!("Duplicate skill {}", id)));
            }
        }
        Ok(())
    }

    fn replace_job_skills(&mut self, job_id: i64, skills: Vec<NewJobSkill>) -> Result<()> {
        self.ensure_skills(skills.iter().map(|s| s.skill_id))?;
        self.job_skills.retain(|s| s.job_id != job_id);
        self.job_skills
            .extend(skills.into_iter().map(|s| JobSkill {
                job_id,
                skill_id: s.skill_id,
                is_required: s.is_required,
                proficiency_level: s.proficiency_level,
            }));
        Ok(())
    }

    /// Users are provisioned by whoever issues the tokens. The first profile
    /// write for an unknown id records a placeholder row for it.
    fn ensure_user(&mut self, user_id: i64, role: Role) {
        if self.users.contains_key(&user_id) {
            return;
        }
        self.next_id = self.next_id.max(user_id);
        let ts = now();
        self.users.insert(
            user_id,
            User {
                id: user_id,
                email: format!("user-{}@{}.local", user_id, role),
                role,
                is_active: true,
                created_at: ts,
                updated_at: ts,
            },
        );
    }

    fn ensure_area(&self, area_id: Option<i64>) -> Result<()> {
        match area_id {
            Some(id) if !self.areas.contains_key(&id) => {
                Err(Error::NotFound(format!("Area {} not found", id)))
            }
            _ => Ok(()),
        }
    }

    fn remove_resume_row(&mut self, section: ResumeSection, candidate_id: i64, id: i64) -> bool {
        if self.resume_created_at(section, candidate_id, id).is_none() {
            return false;
        }
        match section {
            ResumeSection::Experience => self.experiences.remove(&id).is_some(),
            ResumeSection::Education => self.educations.remove(&id).is_some(),
            ResumeSection::Certification => self.certifications.remove(&id).is_some(),
            ResumeSection::Project => self.projects.remove(&id).is_some(),
            ResumeSection::Language => self.languages.remove(&id).is_some(),
        }
    }

    /// Creation time of a resume row, if it exists and belongs to `candidate_id`.
    fn resume_created_at(&self, section: ResumeSection, candidate_id: i64, id: i64) -> Option<DateTime<Utc>> {
        let owned = |owner: i64, created_at: DateTime<Utc>| (owner == candidate_id).then_some(created_at);
        match section {
            ResumeSection::Experience => self.experiences.get(&id).and_then(|r| owned(r.candidate_id, r.created_at)),
            ResumeSection::Education => self.educations.get(&id).and_then(|r| owned(r.candidate_id, r.created_at)),
            ResumeSection::Certification => {
                self.certifications.get(&id).and_then(|r| owned(r.candidate_id, r.created_at))
            }
            ResumeSection::Project => self.projects.get(&id).and_then(|r| owned(r.candidate_id, r.created_at)),
            ResumeSection::Language => self.languages.get(&id).and_then(|r| owned(r.candidate_id, r.created_at)),
        }
    }

    fn write_resume_row(
        &mut self,
        id: i64,
        candidate_id: i64,
        entry: ResumeEntry,
        created_at: DateTime<Utc>,
    ) -> ResumeRecord {
        match entry {
            ResumeEntry::Experience(f) => {
                let row = Experience {
                    id,
                    candidate_id,
                    job_title: f.job_title,
                    company_name: f.company_name,
                    city: f.city,
                    state: f.state,
                    country: f.country,
                    start_date: f.start_date,
                    end_date: f.end_date,
                    is_current_job: f.is_current_job,
                    description: f.description,
                    created_at,
                };
                self.experiences.insert(id, row.clone());
                ResumeRecord::Experience(row)
            }
            ResumeEntry::Education(f) => {
                let row = Education {
                    id,
                    candidate_id,
                    degree_name: f.degree_name,
                    major: f.major,
                    institution_name: f.institution_name,
                    start_date: f.start_date,
                    completion_date: f.completion_date,
                    grade: f.grade,
                    created_at,
                };
                self.educations.insert(id, row.clone());
                ResumeRecord::Education(row)
            }
            ResumeEntry::Certification(f) => {
                let row = Certification {
                    id,
                    candidate_id,
                    name: f.name,
                    issuing_organization: f.issuing_organization,
                    issue_date: f.issue_date,
                    expiration_date: f.expiration_date,
                    credential_id: f.credential_id,
                    credential_url: f.credential_url,
                    created_at,
                };
                self.certifications.insert(id, row.clone());
                ResumeRecord::Certification(row)
            }
            ResumeEntry::Project(f) => {
                let row = Project {
                    id,
                    candidate_id,
                    name: f.name,
                    description: f.description,
                    role: f.role,
                    technologies: f.technologies,
                    start_date: f.start_date,
                    end_date: f.end_date,
                    is_current: f.is_current,
                    project_url: f.project_url,
                    repository_url: f.repository_url,
                    created_at,
                };
                self.projects.insert(id, row.clone());
                ResumeRecord::Project(row)
            }
            ResumeEntry::Language(f) => {
                let row = Language {
                    id,
                    candidate_id,
                    name: f.name,
                    proficiency: f.proficiency,
                    can_read: f.can_read,
                    can_write: f.can_write,
                    can_speak: f.can_speak,
                    created_at,
                };
                self.languages.insert(id, row.clone());
                ResumeRecord::Language(row)
            }
        }
    }
}

/// Process-local [`EntityStore`]. Every operation runs inside one critical
/// section, so check-then-insert sequences are atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, i64)) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut t = self.lock()?;
        if t.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(Error::Conflict(format!("Email {} already registered", user.email)));
        }
        let id = t.next_id();
        let ts = now();
        let row = User {
            id,
            email: user.email,
            role: user.role,
            is_active: true,
            created_at: ts,
            updated_at: ts,
        };
        t.users.insert(id, row.clone());
        Ok(row)
    }

    async fn get_candidate(&self, id: i64) -> Result<CandidateProfile> {
        let t = self.lock()?;
        let candidate = t
            .candidates
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))?;
        Ok(t.candidate_profile(candidate))
    }

    async fn find_candidate_by_user(&self, user_id: i64) -> Result<Option<CandidateProfile>> {
        let t = self.lock()?;
        let candidate = t.candidates.values().find(|c| c.user_id == user_id).cloned();
        Ok(candidate.map(|c| t.candidate_profile(c)))
    }

    async fn upsert_candidate(&self, user_id: i64, fields: CandidateFields) -> Result<Candidate> {
        let mut t = self.lock()?;
        t.ensure_user(user_id, Role::Candidate);
        let ts = now();
        let existing = t.candidates.values().find(|c| c.user_id == user_id).cloned();
        let row = match existing {
            Some(mut c) => {
                if let Some(v) = fields.first_name { c.first_name = v; }
                if let Some(v) = fields.last_name { c.last_name = v; }
                if fields.phone.is_some() { c.phone = fields.phone; }
                if fields.city.is_some() { c.city = fields.city; }
                if fields.state.is_some() { c.state = fields.state; }
                if fields.country.is_some() { c.country = fields.country; }
                if fields.current_title.is_some() { c.current_title = fields.current_title; }
                if fields.professional_summary.is_some() { c.professional_summary = fields.professional_summary; }
                if fields.years_experience.is_some() { c.years_experience = fields.years_experience; }
                if fields.expected_salary.is_some() { c.expected_salary = fields.expected_salary; }
                if let Some(v) = fields.salary_currency { c.salary_currency = v; }
                if fields.linkedin_url.is_some() { c.linkedin_url = fields.linkedin_url; }
                if fields.github_url.is_some() { c.github_url = fields.github_url; }
                if let Some(v) = fields.is_actively_looking { c.is_actively_looking = v; }
                c.updated_at = ts;
                c
            }
            None => Candidate {
                id: t.next_id(),
                user_id,
                first_name: fields.first_name.unwrap_or_default(),
                last_name: fields.last_name.unwrap_or_default(),
                phone: fields.phone,
                city: fields.city,
                state: fields.state,
                country: fields.country,
                current_title: fields.current_title,
                professional_summary: fields.professional_summary,
                years_experience: fields.years_experience,
                expected_salary: fields.expected_salary,
                salary_currency: fields
                    .salary_currency
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                linkedin_url: fields.linkedin_url,
                github_url: fields.github_url,
                is_actively_looking: fields.is_actively_looking.unwrap_or(true),
                created_at: ts,
                updated_at: ts,
            },
        };
        t.candidates.insert(row.id, row.clone());
        Ok(row)
    }

    async fn set_candidate_skills(
        &self,
        candidate_id: i64,
        skills: Vec<(i64, i16)>,
    ) -> Result<Vec<CandidateSkill>> {
        let mut t = self.lock()?;
        if !t.candidates.contains_key(&candidate_id) {
            return Err(Error::NotFound(format!("Candidate {} not found", candidate_id)));
        }
        t.ensure_skills(skills.iter().map(|(id, _)| *id))?;
        t.candidate_skills.retain(|s| s.candidate_id != candidate_id);
        let rows: Vec<CandidateSkill> = skills
            .into_iter()
            .map(|(skill_id, proficiency_level)| CandidateSkill {
                candidate_id,
                skill_id,
                proficiency_level,
            })
            .collect();
        t.candidate_skills.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn search_candidates(
        &self,
        filter: &CandidateFilter,
        page: PageRequest,
    ) -> Result<Page<Candidate>> {
        let t = self.lock()?;
        let mut rows: Vec<Candidate> = t
            .candidates
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        newest_first(&mut rows, |c| (c.created_at, c.id));
        Ok(Page::from_vec(rows, page))
    }

    async fn get_company(&self, id: i64) -> Result<Company> {
        let t = self.lock()?;
        t.companies
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Company {} not found", id)))
    }

    async fn find_company_by_user(&self, user_id: i64) -> Result<Option<Company>> {
        let t = self.lock()?;
        Ok(t.companies.values().find(|c| c.user_id == user_id).cloned())
    }

    async fn upsert_company(&self, user_id: i64, fields: CompanyFields) -> Result<Company> {
        let mut t = self.lock()?;
        t.ensure_user(user_id, Role::Company);
        let ts = now();
        let existing = t.companies.values().find(|c| c.user_id == user_id).cloned();
        let row = match existing {
            Some(mut c) => {
                if let Some(v) = fields.company_name { c.company_name = v; }
                if fields.description.is_some() { c.description = fields.description; }
                if fields.website.is_some() { c.website = fields.website; }
                if fields.sector.is_some() { c.sector = fields.sector; }
                if fields.company_size.is_some() { c.company_size = fields.company_size; }
                if fields.city.is_some() { c.city = fields.city; }
                if fields.state.is_some() { c.state = fields.state; }
                if fields.country.is_some() { c.country = fields.country; }
                c.updated_at = ts;
                c
            }
            None => Company {
                id: t.next_id(),
                user_id,
                company_name: fields.company_name.unwrap_or_default(),
                description: fields.description,
                website: fields.website,
                sector: fields.sector,
                company_size: fields.company_size,
                city: fields.city,
                state: fields.state,
                country: fields.country,
                created_at: ts,
                updated_at: ts,
            },
        };
        t.companies.insert(row.id, row.clone());
        Ok(row)
    }

    async fn create_job(&self, job: NewJob) -> Result<JobDetails> {
        let mut t = self.lock()?;
        if !t.companies.contains_key(&job.company_id) {
            return Err(Error::NotFound(format!("Company {} not found", job.company_id)));
        }
        t.ensure_area(job.area_id)?;
        t.ensure_skills(job.skills.iter().map(|s| s.skill_id))?;

        let id = t.next_id();
        let ts = now();
        let row = Job {
            id,
            company_id: job.company_id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            responsibilities: job.responsibilities,
            benefits: job.benefits,
            area: job.area,
            area_id: job.area_id,
            seniority_level: job.seniority_level,
            work_modality: job.work_modality,
            contract_type: job.contract_type,
            min_salary: job.min_salary,
            max_salary: job.max_salary,
            salary_currency: job
                .salary_currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            city: job.city,
            state: job.state,
            country: job.country,
            is_active: true,
            is_company_hidden: job.is_company_hidden,
            expires_at: job.expires_at,
            created_at: ts,
            updated_at: ts,
        };
        t.jobs.insert(id, row.clone());
        t.replace_job_skills(id, job.skills)?;
        Ok(t.job_details(row))
    }

    async fn get_job(&self, id: i64) -> Result<JobDetails> {
        let t = self.lock()?;
        let job = t
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;
        Ok(t.job_details(job))
    }

    async fn update_job(&self, id: i64, changes: JobChanges) -> Result<JobDetails> {
        let mut t = self.lock()?;
        let mut job = t
            .jobs
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))?;
        t.ensure_area(changes.area_id.flatten())?;
        if let Some(skills) = &changes.skills {
            t.ensure_skills(skills.iter().map(|s| s.skill_id))?;
        }

        if let Some(v) = changes.title { job.title = v; }
        if let Some(v) = changes.description { job.description = v; }
        if let Some(v) = changes.requirements { job.requirements = v; }
        if let Some(v) = changes.responsibilities { job.responsibilities = v; }
        if let Some(v) = changes.benefits { job.benefits = v; }
        if let Some(v) = changes.area { job.area = v; }
        if let Some(v) = changes.area_id { job.area_id = v; }
        if let Some(v) = changes.seniority_level { job.seniority_level = v; }
        if let Some(v) = changes.work_modality { job.work_modality = v; }
        if let Some(v) = changes.contract_type { job.contract_type = v; }
        if let Some(v) = changes.min_salary { job.min_salary = v; }
        if let Some(v) = changes.max_salary { job.max_salary = v; }
        if let Some(v) = changes.salary_currency { job.salary_currency = v; }
        if let Some(v) = changes.city { job.city = v; }
        if let Some(v) = changes.state { job.state = v; }
        if let Some(v) = changes.country { job.country = v; }
        if let Some(v) = changes.is_active { job.is_active = v; }
        if let Some(v) = changes.is_company_hidden { job.is_company_hidden = v; }
        if let Some(v) = changes.expires_at { job.expires_at = v; }
        job.updated_at = now();

        t.jobs.insert(id, job.clone());
        if let Some(skills) = changes.skills {
            t.replace_job_skills(id, skills)?;
        }
        Ok(t.job_details(job))
    }

    async fn delete_job(&self, id: i64) -> Result<()> {
        let mut t = self.lock()?;
        if t.jobs.remove(&id).is_none() {
            return Err(Error::NotFound(format!("Job {} not found", id)));
        }
        t.job_skills.retain(|s| s.job_id != id);
        t.applications.retain(|_, a| a.job_id != id);
        Ok(())
    }

    async fn search_jobs(&self, filter: &JobFilter, page: PageRequest) -> Result<Page<Job>> {
        let t = self.lock()?;
        let mut hits: Vec<Job> = t
            .jobs
            .values()
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        hits.sort_by(|a, b| filter.sort.compare(a, b));
        Ok(Page::from_vec(hits, page))
    }

    async fn list_jobs(
        &self,
        company_id: Option<i64>,
        active: Option<bool>,
        page: PageRequest,
    ) -> Result<Page<Job>> {
        let t = self.lock()?;
        let mut rows: Vec<Job> = t
            .jobs
            .values()
            .filter(|j| company_id.map(|id| j.company_id == id).unwrap_or(true))
            .filter(|j| active.map(|a| j.is_active == a).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| JobSort::Newest.compare(a, b));
        Ok(Page::from_vec(rows, page))
    }

    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let t = self.lock()?;
        let mut rows: Vec<Skill> = t.skills.values().cloned().collect();
        rows.sort_by_key(|s| s.name.to_lowercase());
        Ok(rows)
    }

    async fn create_skill(&self, name: String, category: Option<String>) -> Result<Skill> {
        let mut t = self.lock()?;
        if t.skills.values().any(|s| s.name.to_lowercase() == name.to_lowercase()) {
            return Err(Error::Conflict(format!("Skill '{}' already exists", name)));
        }
        let row = Skill {
            id: t.next_id(),
            name,
            category,
        };
        t.skills.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_areas(&self) -> Result<Vec<Area>> {
        let t = self.lock()?;
        let mut rows: Vec<Area> = t.areas.values().cloned().collect();
        rows.sort_by_key(|a| a.name.to_lowercase());
        Ok(rows)
    }

    async fn create_area(&self, name: String) -> Result<Area> {
        let mut t = self.lock()?;
        if t.areas.values().any(|a| a.name.to_lowercase() == name.to_lowercase()) {
            return Err(Error::Conflict(format!("Area '{}' already exists", name)));
        }
        let row = Area {
            id: t.next_id(),
            name,
        };
        t.areas.insert(row.id, row.clone());
        Ok(row)
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application> {
        let mut t = self.lock()?;
        if !t.jobs.contains_key(&application.job_id) {
            return Err(Error::NotFound(format!("Job {} not found", application.job_id)));
        }
        if !t.candidates.contains_key(&application.candidate_id) {
            return Err(Error::NotFound(format!(
                "Candidate {} not found",
                application.candidate_id
            )));
        }
        if t.applications.values().any(|a| {
            a.job_id == application.job_id && a.candidate_id == application.candidate_id
        }) {
            return Err(Error::Conflict(
                "Candidate has already applied to this job".to_string(),
            ));
        }
        let id = t.next_id();
        let ts = now();
        let row = Application {
            id,
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            status: ApplicationStatus::Pending,
            match_score: application.match_score,
            cover_letter: application.cover_letter,
            applied_at: ts,
            updated_at: ts,
        };
        t.applications.insert(id, row.clone());
        Ok(row)
    }

    async fn get_application(&self, id: i64) -> Result<Application> {
        let t = self.lock()?;
        t.applications
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    async fn update_application_status(
        &self,
        id: i64,
        expected: ApplicationStatus,
        status: ApplicationStatus,
    ) -> Result<Application> {
        let mut t = self.lock()?;
        let row = t
            .applications
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))?;
        if row.status != expected {
            return Err(Error::Conflict(format!(
                "Application {} is no longer '{}'",
                id, expected
            )));
        }
        row.status = status;
        row.updated_at = now();
        Ok(row.clone())
    }

    async fn delete_application(&self, id: i64) -> Result<()> {
        let mut t = self.lock()?;
        t.applications
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    async fn list_candidate_applications(
        &self,
        candidate_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let t = self.lock()?;
        let mut rows: Vec<Application> = t
            .applications
            .values()
            .filter(|a| a.candidate_id == candidate_id)
            .filter(|a| status.map(|s| a.status == s).unwrap_or(true))
            .cloned()
            .collect();
        newest_first(&mut rows, |a| (a.applied_at, a.id));
        Ok(Page::from_vec(rows, page))
    }

    async fn list_job_applications(
        &self,
        job_id: i64,
        status: Option<ApplicationStatus>,
        page: PageRequest,
    ) -> Result<Page<Application>> {
        let t = self.lock()?;
        let mut rows: Vec<Application> = t
            .applications
            .values()
            .filter(|a| a.job_id == job_id)
            .filter(|a| status.map(|s| a.status == s).unwrap_or(true))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then_with(|| b.applied_at.cmp(&a.applied_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(Page::from_vec(rows, page))
    }

    async fn get_resume(&self, candidate_id: i64) -> Result<Resume> {
        let t = self.lock()?;
        if !t.candidates.contains_key(&candidate_id) {
            return Err(Error::NotFound(format!("Candidate {} not found", candidate_id)));
        }
        fn owned<T: Clone>(
            rows: &BTreeMap<i64, T>,
            owner: impl Fn(&T) -> i64,
            candidate_id: i64,
        ) -> Vec<T> {
            rows.values()
                .filter(|r| owner(r) == candidate_id)
                .cloned()
                .collect()
        }

        let mut resume = Resume {
            experiences: owned(&t.experiences, |r| r.candidate_id, candidate_id),
            educations: owned(&t.educations, |r| r.candidate_id, candidate_id),
            certifications: owned(&t.certifications, |r| r.candidate_id, candidate_id),
            projects: owned(&t.projects, |r| r.candidate_id, candidate_id),
            languages: owned(&t.languages, |r| r.candidate_id, candidate_id),
        };
        // Most recent first, matching the SQL backend.
        resume.experiences.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        resume
            .educations
            .sort_by(|a, b| b.completion_date.cmp(&a.completion_date).then(b.id.cmp(&a.id)));
        resume
            .certifications
            .sort_by(|a, b| b.issue_date.cmp(&a.issue_date).then(b.id.cmp(&a.id)));
        resume.projects.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        resume.languages.sort_by_key(|l| l.id);
        Ok(resume)
    }

    async fn create_resume_entry(
        &self,
        candidate_id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord> {
        let mut t = self.lock()?;
        if !t.candidates.contains_key(&candidate_id) {
            return Err(Error::NotFound(format!("Candidate {} not found", candidate_id)));
        }
        let id = t.next_id();
        Ok(t.write_resume_row(id, candidate_id, entry, now()))
    }

    async fn update_resume_entry(
        &self,
        candidate_id: i64,
        id: i64,
        entry: ResumeEntry,
    ) -> Result<ResumeRecord> {
        let mut t = self.lock()?;
        let section = entry.section();
        let created_at = t
            .resume_created_at(section, candidate_id, id)
            .ok_or_else(|| Error::NotFound(format!("{} entry {} not found", section.table(), id)))?;
        Ok(t.write_resume_row(id, candidate_id, entry, created_at))
    }

    async fn delete_resume_entry(
        &self,
        candidate_id: i64,
        section: ResumeSection,
        id: i64,
    ) -> Result<()> {
        let mut t = self.lock()?;
        if t.remove_resume_row(section, candidate_id, id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("{} entry {} not found", section.table(), id)))
        }
    }

    async fn stats(&self) -> Result<PlatformStats> {
        let t = self.lock()?;
        Ok(PlatformStats {
            active_jobs: t.jobs.values().filter(|j| j.is_active).count() as i64,
            companies: t.companies.len() as i64,
            candidates: t.candidates.len() as i64,
            applications: t.applications.len() as i64,
        })
    }

    async fn company_stats(&self, company_id: i64) -> Result<CompanyStats> {
        let t = self.lock()?;
        let jobs: HashSet<i64> = t
            .jobs
            .values()
            .filter(|j| j.company_id == company_id)
            .map(|j| j.id)
            .collect();
        Ok(CompanyStats {
            total_jobs: jobs.len() as i64,
            active_jobs: t
                .jobs
                .values()
                .filter(|j| j.company_id == company_id && j.is_active)
                .count() as i64,
            total_applications: t
                .applications
                .values()
                .filter(|a| jobs.contains(&a.job_id))
                .count() as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    async fn seed(store: &MemoryStore) -> (i64, i64) {
        let company_user = store
            .create_user(NewUser { email: "hr@acme.test".into(), role: Role::Company })
            .await
            .unwrap();
        let company = store
            .upsert_company(
                company_user.id,
                CompanyFields { company_name: Some("Acme".into()), ..Default::default() },
            )
            .await
            .unwrap();
        let candidate_user = store
            .create_user(NewUser { email: "ana@mail.test".into(), role: Role::Candidate })
            .await
            .unwrap();
        let candidate = store
            .upsert_candidate(
                candidate_user.id,
                CandidateFields {
                    first_name: Some("Ana".into()),
                    last_name: Some("Silva".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let job = store
            .create_job(NewJob {
                company_id: company.id,
                title: "Backend".into(),
                description: "Rust".into(),
                min_salary: Some(Decimal::from(5000)),
                max_salary: Some(Decimal::from(8000)),
                ..Default::default()
            })
            .await
            .unwrap();
        (job.job.id, candidate.id)
    }

    #[tokio::test]
    async fn concurrent_applies_yield_one_conflict() {
        let store = Arc::new(MemoryStore::new());
        let (job_id, candidate_id) = seed(&store).await;

        let attempt = move |store: Arc<MemoryStore>| async move {
            store
                .create_application(NewApplication {
                    job_id,
                    candidate_id,
                    match_score: 50,
                    cover_letter: None,
                })
                .await
        };
        let (a, b) = tokio::join!(
            tokio::spawn(attempt(store.clone())),
            tokio::spawn(attempt(store.clone()))
        );
        let results = [a.unwrap(), b.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(Error::Conflict(_))))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn skill_names_are_unique_case_insensitively() {
        let store = MemoryStore::new();
        store.create_skill("Rust".into(), None).await.unwrap();
        let dup = store.create_skill("rust".into(), Some("lang".into())).await;
        assert!(matches!(dup, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn job_requires_existing_area_and_skills() {
        let store = MemoryStore::new();
        let (job_id, _) = seed(&store).await;
        let company_id = store.get_job(job_id).await.unwrap().job.company_id;

        let missing_area = store
            .create_job(NewJob {
                company_id,
                title: "x".into(),
                description: "y".into(),
                area_id: Some(999),
                ..Default::default()
            })
            .await;
        assert!(matches!(missing_area, Err(Error::NotFound(_))));

        let missing_skill = store
            .update_job(
                job_id,
                JobChanges {
                    skills: Some(vec![NewJobSkill { skill_id: 999, is_required: true, proficiency_level: 3 }]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(missing_skill, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn deleting_a_job_removes_its_applications() {
        let store = MemoryStore::new();
        let (job_id, candidate_id) = seed(&store).await;
        let app = store
            .create_application(NewApplication { job_id, candidate_id, match_score: 80, cover_letter: None })
            .await
            .unwrap();

        store.delete_job(job_id).await.unwrap();
        assert!(matches!(store.get_application(app.id).await, Err(Error::NotFound(_))));
        assert_eq!(store.stats().await.unwrap().applications, 0);
    }

    #[tokio::test]
    async fn resume_rows_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let (_, candidate_id) = seed(&store).await;
        let entry = ResumeEntry::Language(crate::models::resume::LanguageFields {
            name: "English".into(),
            proficiency: Some("fluent".into()),
            can_read: true,
            can_write: true,
            can_speak: true,
        });
        let row = store.create_resume_entry(candidate_id, entry.clone()).await.unwrap();

        let foreign = store.update_resume_entry(candidate_id + 1000, row.id(), entry).await;
        assert!(matches!(foreign, Err(Error::NotFound(_))));
        let wrong_section = store
            .delete_resume_entry(candidate_id, ResumeSection::Project, row.id())
            .await;
        assert!(matches!(wrong_section, Err(Error::NotFound(_))));

        store
            .delete_resume_entry(candidate_id, ResumeSection::Language, row.id())
            .await
            .unwrap();
        assert!(store.get_resume(candidate_id).await.unwrap().languages.is_empty());
    }

    #[tokio::test]
    async fn status_update_requires_the_expected_current_status() {
        let store = MemoryStore::new();
        let (job_id, candidate_id) = seed(&store).await;
        let app = store
            .create_application(NewApplication { job_id, candidate_id, match_score: 60, cover_letter: None })
            .await
            .unwrap();
        store
            .update_application_status(app.id, ApplicationStatus::Pending, ApplicationStatus::Interview)
            .await
            .unwrap();

        let approved = store
            .update_application_status(app.id, ApplicationStatus::Interview, ApplicationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);

        // A second writer that read `interview` before the approval lands.
        let stale = store
            .update_application_status(app.id, ApplicationStatus::Interview, ApplicationStatus::Rejected)
            .await;
        assert!(matches!(stale, Err(Error::Conflict(_))));
        assert_eq!(
            store.get_application(app.id).await.unwrap().status,
            ApplicationStatus::Approved
        );

        let missing = store
            .update_application_status(app.id + 1000, ApplicationStatus::Pending, ApplicationStatus::Reviewing)
            .await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn first_profile_write_provisions_the_user() {
        let store = MemoryStore::new();
        let candidate = store
            .upsert_candidate(
                42,
                CandidateFields {
                    first_name: Some("Ana".into()),
                    last_name: Some("Silva".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(candidate.user_id, 42);
        assert!(candidate.id > 42);

        let company = store
            .upsert_company(7, CompanyFields { company_name: Some("Acme".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(company.user_id, 7);

        let user = store
            .create_user(NewUser { email: "new@mail.test".into(), role: Role::Admin })
            .await
            .unwrap();
        assert!(user.id > candidate.id);
    }
}
