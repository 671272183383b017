use crate::models::users::entities::{User, UserRole};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "course.ts")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub cover_image: Option<String>,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 用户在课程中的身份
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "course.ts")]
pub enum CourseRole {
    Admin,   // 系统管理员
    Owner,   // 授课教师
    Student, // 已选课学生
}

impl CourseRole {
    /// 课程成员（可查看资料、作业、公告）
    pub fn members() -> &'static [CourseRole] {
        &[CourseRole::Admin, CourseRole::Owner, CourseRole::Student]
    }

    /// 课程管理者（可修改课程内容、批改作业）
    pub fn managers() -> &'static [CourseRole] {
        &[CourseRole::Admin, CourseRole::Owner]
    }

    pub fn students() -> &'static [CourseRole] {
        &[CourseRole::Student]
    }

    pub fn can_manage(&self) -> bool {
        matches!(self, CourseRole::Admin | CourseRole::Owner)
    }
}

/// 当前用户与课程的关系，由课程权限中间件写入请求扩展
#[derive(Debug, Clone)]
pub struct CourseMembership {
    pub course: Course,
    pub role: CourseRole,
}

impl CourseMembership {
    /// 判定用户在课程中的身份；既不是管理员、教师也未选课时返回 None
    pub fn resolve(user: &User, course: Course, enrolled: bool) -> Option<Self> {
        let role = if user.role == UserRole::Admin {
            CourseRole::Admin
        } else if course.teacher_id == user.id {
            CourseRole::Owner
        } else if enrolled {
            CourseRole::Student
        } else {
            return None;
        };
        Some(Self { course, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, role: UserRole) -> User {
        User {
            id,
            email: format!("{id}@lms.test"),
            password_hash: String::new(),
            name: id.to_string(),
            role,
            avatar_url: None,
            bio: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn course(teacher_id: i64) -> Course {
        Course {
            id: 1,
            title: "Rust".to_string(),
            description: None,
            teacher_id,
            cover_image: None,
            is_published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_resolve_membership() {
        let admin = CourseMembership::resolve(&user(1, UserRole::Admin), course(2), false);
        assert_eq!(admin.map(|m| m.role), Some(CourseRole::Admin));

        let owner = CourseMembership::resolve(&user(2, UserRole::Teacher), course(2), false);
        assert_eq!(owner.map(|m| m.role), Some(CourseRole::Owner));

        let student = CourseMembership::resolve(&user(3, UserRole::Student), course(2), true);
        assert_eq!(student.map(|m| m.role), Some(CourseRole::Student));

        let other_teacher = CourseMembership::resolve(&user(4, UserRole::Teacher), course(2), false);
        assert!(other_teacher.is_none());
    }

    #[test]
    fn test_managers() {
        assert!(CourseRole::Owner.can_manage());
        assert!(!CourseRole::Student.can_manage());
        assert!(CourseRole::members().contains(&CourseRole::Student));
        assert!(!CourseRole::managers().contains(&CourseRole::Student));
    }
}
