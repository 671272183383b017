//! 存储层
//!
//! [`Storage`] 描述 LMS 的全部领域操作，服务层只依赖这个 trait；
//! [`sea_orm_storage::SeaOrmStorage`] 基于类型化客户端实现它。

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    // 数据库连通性检查
    async fn ping(&self) -> Result<()>;

    /// 用户管理方法
    // 创建用户，password 字段需已是哈希
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息，password 字段需已是哈希
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 统计用户数
    async fn count_users(&self, role: Option<UserRole>) -> Result<u64>;

    /// 课程管理方法
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    // 学生已选的课程
    async fn list_student_courses_with_pagination(
        &self,
        user_id: i64,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;

    /// 选课方法
    // 选课，已选时返回 Conflict
    async fn enroll_user(&self, user_id: i64, course_id: i64) -> Result<CourseEnrollment>;
    async fn unenroll_user(&self, user_id: i64, course_id: i64) -> Result<bool>;
    async fn get_enrollment(&self, user_id: i64, course_id: i64)
    -> Result<Option<CourseEnrollment>>;
    async fn list_course_enrollments_with_pagination(
        &self,
        course_id: i64,
        query: PaginationQuery,
    ) -> Result<EnrollmentListResponse>;
    async fn count_course_enrollments(&self, course_id: i64) -> Result<u64>;
    // 手动设置进度，超出 0..=100 时截断
    async fn update_enrollment_progress(
        &self,
        user_id: i64,
        course_id: i64,
        progress: f64,
    ) -> Result<Option<CourseEnrollment>>;

    /// 课程资料方法
    async fn create_material(
        &self,
        course_id: i64,
        material: CreateMaterialRequest,
    ) -> Result<CourseMaterial>;
    async fn get_material(&self, material_id: i64) -> Result<Option<CourseMaterial>>;
    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>>;
    async fn update_material(
        &self,
        material_id: i64,
        update: UpdateMaterialRequest,
    ) -> Result<Option<CourseMaterial>>;
    async fn delete_material(&self, material_id: i64) -> Result<bool>;

    /// 作业方法，增删改后重新计算课程内所有学生的进度
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;

    /// 提交与批改方法
    // 提交或重新提交；已批改的提交返回 Conflict
    async fn submit_assignment(
        &self,
        assignment_id: i64,
        user_id: i64,
        submission: SubmitAssignmentRequest,
    ) -> Result<AssignmentSubmission>;
    async fn get_submission(&self, submission_id: i64) -> Result<Option<AssignmentSubmission>>;
    async fn get_user_submission(
        &self,
        assignment_id: i64,
        user_id: i64,
    ) -> Result<Option<AssignmentSubmission>>;
    async fn list_assignment_submissions_with_pagination(
        &self,
        assignment_id: i64,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    // 分数越界返回 Validation
    async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
    ) -> Result<Option<AssignmentSubmission>>;
    async fn get_assignment_grade_stats(&self, assignment_id: i64) -> Result<GradeStats>;
    async fn get_submission_status_breakdown(&self, assignment_id: i64)
    -> Result<Vec<StatusCount>>;

    /// 站内消息方法
    async fn send_message(&self, sender_id: i64, message: SendMessageRequest) -> Result<Message>;
    async fn get_message(&self, message_id: i64) -> Result<Option<Message>>;
    async fn list_inbox_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
        unread_only: bool,
    ) -> Result<MessageListResponse>;
    async fn list_sent_with_pagination(
        &self,
        user_id: i64,
        query: PaginationQuery,
    ) -> Result<MessageListResponse>;
    // 只有收件人可以标记已读
    async fn mark_message_read(&self, message_id: i64, receiver_id: i64) -> Result<bool>;
    async fn count_unread_messages(&self, user_id: i64) -> Result<u64>;
    async fn delete_message(&self, message_id: i64) -> Result<bool>;

    /// 课程公告方法
    async fn create_announcement(
        &self,
        course_id: i64,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement(&self, announcement_id: i64) -> Result<Option<Announcement>>;
    async fn list_course_announcements(&self, course_id: i64) -> Result<Vec<Announcement>>;
    async fn update_announcement(
        &self,
        announcement_id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool>;

    /// 学习进度方法
    async fn recompute_progress(&self, user_id: i64, course_id: i64) -> Result<StudentProgress>;
    async fn get_progress(&self, user_id: i64, course_id: i64) -> Result<Option<StudentProgress>>;
    async fn list_course_progress(&self, course_id: i64) -> Result<Vec<StudentProgress>>;
}
