//! Shared mock repositories and portal fixture for integration tests

use async_trait::async_trait;
use campus_portal::contract::{
    Account, Assignment, AuthContext, Course, CourseMaterial, CourseResult, DepartmentCount,
    Message, MessageStatus, NewAccount, NewAssignment, NewCourse, NewMessage, Profile, Role,
    Submission, User,
};
use campus_portal::domain::repository::{
    AccountRepository, AssignmentRepository, CourseRepository, MessageRepository, ResultRepository,
};
use campus_portal::domain::{
    AuthService, ChatService, CourseService, ReportService, TokenSigner,
};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct AccountsInner {
    next_id: i64,
    users: HashMap<i64, User>,
    /// Keyed by user id; profile id mirrors the user id
    profiles: HashMap<i64, Profile>,
}

#[derive(Clone, Default)]
pub struct MockAccountRepo {
    inner: Arc<RwLock<AccountsInner>>,
}

impl MockAccountRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn account(inner: &AccountsInner, user_id: i64) -> Option<Account> {
        let user = inner.users.get(&user_id)?.clone();
        let profile = inner.profiles.get(&user_id)?.clone();
        Some(Account { user, profile })
    }

    fn accounts_where(&self, pred: impl Fn(&Profile) -> bool) -> Vec<Account> {
        let inner = self.inner.read();
        let mut ids: Vec<i64> = inner
            .profiles
            .values()
            .filter(|p| pred(p))
            .map(|p| p.user_id)
            .collect();
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| Self::account(&inner, id))
            .collect()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepo {
    async fn create(&self, account: NewAccount) -> anyhow::Result<Account> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = inner.next_id;
        let now = Utc::now();
        let user = User {
            id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
        };
        let profile = Profile {
            id,
            user_id: id,
            role: account.role,
            lecturer_id: account.lecturer_id,
            department: account.department,
            is_approved: account.is_approved,
            profile_image: None,
            created_at: now,
        };
        inner.users.insert(id, user.clone());
        inner.profiles.insert(id, profile.clone());
        Ok(Account { user, profile })
    }

    async fn find_user(&self, user_id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.inner.read().users.get(&user_id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_profile_by_user(&self, user_id: i64) -> anyhow::Result<Option<Profile>> {
        Ok(self.inner.read().profiles.get(&user_id).cloned())
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        Ok(self
            .inner
            .read()
            .users
            .values()
            .any(|u| u.username == username))
    }

    async fn lecturer_id_exists(&self, lecturer_id: &str) -> anyhow::Result<bool> {
        Ok(self
            .inner
            .read()
            .profiles
            .values()
            .any(|p| p.lecturer_id.as_deref() == Some(lecturer_id)))
    }

    async fn set_approved(&self, user_id: i64, approved: bool) -> anyhow::Result<()> {
        if let Some(profile) = self.inner.write().profiles.get_mut(&user_id) {
            profile.is_approved = approved;
        }
        Ok(())
    }

    async fn set_profile_image(&self, user_id: i64, path: &str) -> anyhow::Result<()> {
        if let Some(profile) = self.inner.write().profiles.get_mut(&user_id) {
            profile.profile_image = Some(path.to_string());
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> anyhow::Result<()> {
        let mut inner = self.inner.write();
        inner.users.remove(&user_id);
        inner.profiles.remove(&user_id);
        Ok(())
    }

    async fn list_by_role(&self, role: Role) -> anyhow::Result<Vec<Account>> {
        Ok(self.accounts_where(|p| p.role == role))
    }

    async fn list_pending_students(&self) -> anyhow::Result<Vec<Account>> {
        Ok(self.accounts_where(|p| p.role == Role::Student && !p.is_approved))
    }

    async fn count_by_role(&self, role: Role) -> anyhow::Result<u64> {
        Ok(self
            .inner
            .read()
            .profiles
            .values()
            .filter(|p| p.role == role)
            .count() as u64)
    }

    async fn count_students_in_department(&self, department: &str) -> anyhow::Result<u64> {
        Ok(self
            .inner
            .read()
            .profiles
            .values()
            .filter(|p| p.role == Role::Student && p.department.as_deref() == Some(department))
            .count() as u64)
    }

    async fn count_students_by_department(&self) -> anyhow::Result<Vec<DepartmentCount>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for profile in self.inner.read().profiles.values() {
            if profile.role != Role::Student {
                continue;
            }
            if let Some(department) = &profile.department {
                *counts.entry(department.clone()).or_default() += 1;
            }
        }
        let mut counts: Vec<DepartmentCount> = counts
            .into_iter()
            .map(|(department, count)| DepartmentCount { department, count })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.department.cmp(&b.department)));
        Ok(counts)
    }
}

#[derive(Default)]
struct CoursesInner {
    next_id: i64,
    courses: HashMap<i64, Course>,
    materials: Vec<CourseMaterial>,
}

#[derive(Clone, Default)]
pub struct MockCourseRepo {
    inner: Arc<RwLock<CoursesInner>>,
}

impl MockCourseRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn courses_where(&self, pred: impl Fn(&Course) -> bool) -> Vec<Course> {
        let mut courses: Vec<Course> = self
            .inner
            .read()
            .courses
            .values()
            .filter(|c| pred(c))
            .cloned()
            .collect();
        courses.sort_by_key(|c| c.id);
        courses
    }
}

#[async_trait]
impl CourseRepository for MockCourseRepo {
    async fn create(&self, course: NewCourse) -> anyhow::Result<Course> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let created = Course {
            id: inner.next_id,
            title: course.title,
            description: course.description,
            department: course.department,
            lecturer_id: course.lecturer_id,
            created_at: Utc::now(),
        };
        inner.courses.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find(&self, course_id: i64) -> anyhow::Result<Option<Course>> {
        Ok(self.inner.read().courses.get(&course_id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Course>> {
        Ok(self.courses_where(|_| true))
    }

    async fn list_by_department(&self, department: &str) -> anyhow::Result<Vec<Course>> {
        Ok(self.courses_where(|c| c.department == department))
    }

    async fn list_by_lecturer(&self, lecturer_profile_id: i64) -> anyhow::Result<Vec<Course>> {
        Ok(self.courses_where(|c| c.lecturer_id == Some(lecturer_profile_id)))
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.inner.read().courses.len() as u64)
    }

    async fn add_material(
        &self,
        course_id: i64,
        title: &str,
        file_path: &str,
    ) -> anyhow::Result<CourseMaterial> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let material = CourseMaterial {
            id: inner.next_id,
            course_id,
            title: title.to_string(),
            file_path: file_path.to_string(),
            uploaded_at: Utc::now(),
        };
        inner.materials.push(material.clone());
        Ok(material)
    }

    async fn materials_for(&self, course_id: i64) -> anyhow::Result<Vec<CourseMaterial>> {
        Ok(self
            .inner
            .read()
            .materials
            .iter()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct AssignmentsInner {
    next_id: i64,
    assignments: HashMap<i64, Assignment>,
    submissions: Vec<Submission>,
}

/// Holds a course repo handle so department listings can resolve course ids
#[derive(Clone)]
pub struct MockAssignmentRepo {
    inner: Arc<RwLock<AssignmentsInner>>,
    courses: MockCourseRepo,
}

impl MockAssignmentRepo {
    pub fn new(courses: MockCourseRepo) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AssignmentsInner::default())),
            courses,
        }
    }
}

#[async_trait]
impl AssignmentRepository for MockAssignmentRepo {
    async fn create(&self, assignment: NewAssignment) -> anyhow::Result<Assignment> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let created = Assignment {
            id: inner.next_id,
            title: assignment.title,
            description: assignment.description,
            lecturer_id: assignment.lecturer_id,
            course_id: assignment.course_id,
            created_at: Utc::now(),
            due_date: assignment.due_date,
        };
        inner.assignments.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find(&self, assignment_id: i64) -> anyhow::Result<Option<Assignment>> {
        Ok(self.inner.read().assignments.get(&assignment_id).cloned())
    }

    async fn list_by_course(&self, course_id: i64) -> anyhow::Result<Vec<Assignment>> {
        let mut assignments: Vec<Assignment> = self
            .inner
            .read()
            .assignments
            .values()
            .filter(|a| a.course_id == Some(course_id))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(assignments)
    }

    async fn list_by_department(&self, department: &str) -> anyhow::Result<Vec<Assignment>> {
        let course_ids: Vec<i64> = self
            .courses
            .list_by_department(department)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let mut assignments: Vec<Assignment> = self
            .inner
            .read()
            .assignments
            .values()
            .filter(|a| a.course_id.is_some_and(|id| course_ids.contains(&id)))
            .cloned()
            .collect();
        assignments.sort_by_key(|a| a.id);
        Ok(assignments)
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(self.inner.read().assignments.len() as u64)
    }

    async fn add_submission(
        &self,
        assignment_id: i64,
        student_profile_id: i64,
        file_path: &str,
    ) -> anyhow::Result<Submission> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let submission = Submission {
            id: inner.next_id,
            assignment_id,
            student_id: student_profile_id,
            file_path: file_path.to_string(),
            feedback: String::new(),
            created_at: Utc::now(),
        };
        inner.submissions.push(submission.clone());
        Ok(submission)
    }

    async fn submissions_for(&self, assignment_id: i64) -> anyhow::Result<Vec<Submission>> {
        Ok(self
            .inner
            .read()
            .submissions
            .iter()
            .filter(|s| s.assignment_id == assignment_id)
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockResultRepo {
    inner: Arc<RwLock<Vec<CourseResult>>>,
}

impl MockResultRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultRepository for MockResultRepo {
    async fn record(
        &self,
        student_profile_id: i64,
        course_id: i64,
        score: Decimal,
        grade: Option<&str>,
    ) -> anyhow::Result<CourseResult> {
        let mut results = self.inner.write();
        let result = CourseResult {
            id: results.len() as i64 + 1,
            student_id: student_profile_id,
            course_id,
            score,
            grade: grade.map(ToString::to_string),
        };
        results.push(result.clone());
        Ok(result)
    }

    async fn list_for_courses(&self, course_ids: &[i64]) -> anyhow::Result<Vec<CourseResult>> {
        Ok(self
            .inner
            .read()
            .iter()
            .filter(|r| course_ids.contains(&r.course_id))
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct MockMessageRepo {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl MockMessageRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for MockMessageRepo {
    async fn create(
        &self,
        sender_id: i64,
        recipient_id: i64,
        message: NewMessage,
    ) -> anyhow::Result<Message> {
        let mut messages = self.inner.write();
        let created = Message {
            id: messages.len() as i64 + 1,
            sender_id,
            recipient_id,
            body: message.body,
            audio_path: message.audio_path,
            attachment_path: message.attachment_path,
            client_id: message.client_id,
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        };
        messages.push(created.clone());
        Ok(created)
    }

    async fn conversation(&self, user_a: i64, user_b: i64) -> anyhow::Result<Vec<Message>> {
        let pair = [user_a, user_b];
        let mut messages: Vec<Message> = self
            .inner
            .read()
            .iter()
            .filter(|m| pair.contains(&m.sender_id) && pair.contains(&m.recipient_id))
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.id);
        Ok(messages)
    }

    async fn set_status(&self, message_ids: &[i64], status: MessageStatus) -> anyhow::Result<()> {
        for message in self.inner.write().iter_mut() {
            if message_ids.contains(&message.id) {
                message.status = status;
            }
        }
        Ok(())
    }
}

/// All portal services wired over the in-memory repositories
pub struct TestPortal {
    pub accounts: Arc<MockAccountRepo>,
    pub auth: AuthService,
    pub courses: CourseService,
    pub chat: ChatService,
    pub reports: ReportService,
}

impl TestPortal {
    pub fn new() -> Self {
        let accounts = Arc::new(MockAccountRepo::new());
        let course_repo = MockCourseRepo::new();
        let courses = Arc::new(course_repo.clone());
        let assignments = Arc::new(MockAssignmentRepo::new(course_repo));
        let results = Arc::new(MockResultRepo::new());
        let messages = Arc::new(MockMessageRepo::new());

        let auth = AuthService::new(
            accounts.clone(),
            TokenSigner::new("integration-test-secret", 3600),
        );
        let course_service = CourseService::new(
            accounts.clone(),
            courses.clone(),
            assignments,
            results,
        );
        let chat = ChatService::new(accounts.clone(), messages);
        let reports = ReportService::new(accounts.clone(), courses);

        Self {
            accounts,
            auth,
            courses: course_service,
            chat,
            reports,
        }
    }

    /// Insert an account straight into the repository, bypassing registration
    /// rules. Password is a placeholder; use [`AuthService::register`] when the
    /// test needs to log in.
    pub async fn seed_account(
        &self,
        role: Role,
        username: &str,
        department: Option<&str>,
        lecturer_id: Option<&str>,
        approved: bool,
    ) -> Account {
        self.accounts
            .create(NewAccount {
                username: username.to_string(),
                email: format!("{}@portal.edu", username),
                password_hash: "unused".to_string(),
                role,
                lecturer_id: lecturer_id.map(ToString::to_string),
                department: department.map(ToString::to_string),
                is_approved: approved,
            })
            .await
            .unwrap()
    }

    pub async fn seed_admin(&self) -> AuthContext {
        let account = self.seed_account(Role::Admin, "portal_admin", None, None, true).await;
        AuthContext::new(account.user.id, Role::Admin)
    }

    pub async fn seed_lecturer(&self, username: &str, department: &str) -> (Account, AuthContext) {
        let account = self
            .seed_account(
                Role::Lecturer,
                username,
                Some(department),
                Some(&format!("L-{}", username)),
                true,
            )
            .await;
        let ctx = AuthContext::new(account.user.id, Role::Lecturer);
        (account, ctx)
    }

    pub async fn seed_student(&self, username: &str, department: &str) -> (Account, AuthContext) {
        let account = self
            .seed_account(Role::Student, username, Some(department), None, true)
            .await;
        let ctx = AuthContext::new(account.user.id, Role::Student);
        (account, ctx)
    }
}

impl Default for TestPortal {
    fn default() -> Self {
        Self::new()
    }
}
