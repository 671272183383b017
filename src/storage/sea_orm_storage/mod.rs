//! SeaORM 存储实现
//!
//! 所有读写都经由类型化客户端 [`LmsClient`] 完成，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod assignments;
mod courses;
mod enrollments;
mod materials;
mod messages;
mod progress;
mod submissions;
mod users;

#[cfg(test)]
mod tests;

use crate::client::LmsClient;
use crate::config::AppConfig;
use crate::errors::Result;
use tracing::info;

/// 每页最大条数
const MAX_PAGE_SIZE: i64 = 100;
const MAX_PAGE: i64 = 1_000_000;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) client: LmsClient,
}

impl SeaOrmStorage {
    /// 按全局配置连接数据库并执行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let client = LmsClient::connect(&config.database).await?;
        info!("SeaORM 存储初始化完成");
        Ok(Self { client })
    }

    /// 使用已连接的客户端
    pub fn from_client(client: LmsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &LmsClient {
        &self.client
    }
}

/// 规范化分页参数，返回 (page, size)
pub(crate) fn page_params(page: Option<i64>, size: Option<i64>) -> (i64, i64) {
    (
        page.unwrap_or(1).clamp(1, MAX_PAGE),
        size.unwrap_or(10).clamp(1, MAX_PAGE_SIZE),
    )
}

/// 把“记录不存在”转为 `None`
pub(crate) fn found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::models::{
    PaginationQuery,
    announcements::{
        entities::Announcement,
        requests::{CreateAnnouncementRequest, UpdateAnnouncementRequest},
    },
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    enrollments::{entities::CourseEnrollment, responses::EnrollmentListResponse},
    materials::{
        entities::CourseMaterial,
        requests::{CreateMaterialRequest, UpdateMaterialRequest},
    },
    messages::{
        entities::Message, requests::SendMessageRequest, responses::MessageListResponse,
    },
    progress::entities::StudentProgress,
    submissions::{
        entities::AssignmentSubmission,
        requests::{GradeSubmissionRequest, SubmissionListQuery, SubmitAssignmentRequest},
        responses::{GradeStats, StatusCount, SubmissionListResponse},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn ping(&self) -> Result<()> {
        self.client.ping().await
    }

    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self, role: Option<UserRole>) -> Result<u64> {
        self.count_users_impl(role).await
    }

    // 课程模块
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(teacher_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn list_student_courses_with_pagination(
        &self,
        user_id: i64,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_student_courses_with_pagination_impl(user_id, query)
            .await
    }

    // 选课模块
    async fn enroll_user(&self, user_id: i64, course_id: i64) -> Result<CourseEnrollment> {
        self.enroll_user_impl(user_id, course_id).await
    }

    async fn unenroll_user(&self, user_id: i64, course_id: i64) -> Result<bool> {
        self.unenroll_user_impl(user_id, course_id).await
    }

    async fn get_enrollment(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<CourseEnrollment>> {
        self.get_enrollment_impl(user_id, course_id).await
    }

    async fn list_course_enrollments_with_pagination(
        &self,
        course_id: i64,
        query: PaginationQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_course_enrollments_with_pagination_impl(course_id, query)
            .await
    }

    async fn count_course_enrollments(&self, course_id: i64) -> Result<u64> {
        self.count_course_enrollments_impl(course_id).await
    }

    async fn update_enrollment_progress(
        &self,
        user_id: i64,
        course_id: i64,
        progress: f64,
    ) -> Result<Option<CourseEnrollment>> {
        self.update_enrollment_progress_impl(user_id, course_id, progress)
            .await
    }

    // 课程资料模块
    async fn create_material(
        &self,
        course_id: i64,
        material: CreateMaterialRequest,
    ) -> Result<CourseMaterial> {
        self.create_material_impl(course_id, material).await
    }

    async fn get_material(&self, material_id: i64) -> Result<Option<CourseMaterial>> {
        self.get_material_impl(material_id).await
    }

    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        self.list_course_materials_impl(course_id).await
    }

    async fn update_material(
        &self,
        material_id: i64,
        update: UpdateMaterialRequest,
    ) -> Result<Option<CourseMaterial>> {
        self.update_material_impl(material_id, update).await
    }

    async fn delete_material(&self, material_id: i64) -> Result<bool> {
        self.delete_material_impl(material_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(course_id, assignment).await
    }

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(assignment_id).await
    }

    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_course_assignments_impl(course_id).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    // 提交模块
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
        submission: SubmitAssignmentRequest,
    ) -> Result<AssignmentSubmission> {
        self.submit_assignment_impl(assignment_id, user_id, submission)
            .await
    }

    async fn get_submission(&self, submission_id: i64) -> Result<Option<AssignmentSubmission>> {
        self.get_submission_impl(submission_id).await
    }

    async fn get_user_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<AssignmentSubmission>> {
        self.get_user_submission_impl(assignment_id, user_id).await
    }

    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        self.list_assignment_submissions_with_pagination_impl(assignment_id, query)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>> {
        self.grade_submission_impl(submission_id, grade).await
    }

    async fn get_assignment_grade_stats(&self, assignment_id: i64) -> Result<GradeStats> {
        self.get_assignment_grade_stats_impl(assignment_id).await
    }

    async fn get_submission_status_breakdown(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<StatusCount>> {
        self.get_submission_status_breakdown_impl(assignment_id)
            .await
    }

    // 消息模块
    async fn send_message(&self, sender_id: i64, message: SendMessageRequest) -> Result<Message> {
        self.send_message_impl(sender_id, message).await
    }

    async fn get_message(&self, message_id: i64) -> Result<Option<Message>> {
        self.get_message_impl(message_id).await
    }

    async fn list_inbox_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
        unread_only: bool,
    ) -> Result<MessageListResponse> {
        self.list_inbox_with_pagination_impl(user_id, query, unread_only)
            .await
    }

    async fn list_sent_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<MessageListResponse> {
        self.list_sent_with_pagination_impl(user_id, query).await
    }

    async fn mark_message_read(&self, message_id: i64, receiver_id: i64) -> Result<bool> {
        self.mark_message_read_impl(message_id, receiver_id).await
    }

    async fn count_unread_messages(&self, user_id: i64) -> Result<u64> {
        self.count_unread_messages_impl(user_id).await
    }

    async fn delete_message(&self, message_id: i64) -> Result<bool> {
        self.delete_message_impl(message_id).await
    }

    // 公告模块
    async fn create_announcement(
        &self,
        course_id: i64,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        self.create_announcement_impl(course_id, author_id, announcement)
            .await
    }

    async fn get_announcement(&self, announcement_id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_impl(announcement_id).await
    }

    async fn list_course_announcements(&self, course_id: i64) -> Result<Vec<Announcement>> {
        self.list_course_announcements_impl(course_id).await
    }

    async fn update_announcement(
        &self,
        announcement_id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        self.update_announcement_impl(announcement_id, update).await
    }

    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool> {
        self.delete_announcement_impl(announcement_id).await
    }

    // 学习进度模块
    async fn recompute_progress(&self, user_id: i64, course_id: i64) -> Result<StudentProgress> {
        self.recompute_progress_impl(user_id, course_id).await
    }

    async fn get_progress(&self, user_id: i64, course_id: i64) -> Result<Option<StudentProgress>> {
        self.get_progress_impl(user_id, course_id).await
    }

    async fn list_course_progress(&self, course_id: i64) -> Result<Vec<StudentProgress>> {
        self.list_course_progress_impl(course_id).await
    }
}
