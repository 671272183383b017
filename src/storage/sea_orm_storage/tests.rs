use chrono::{Duration, Utc};

use super::SeaOrmStorage;
use crate::client::LmsClient;
use crate::config::DatabaseConfig;
use crate::errors::LmsError;
use crate::models::{
    PaginationQuery,
    assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    courses::requests::{CourseListQuery, CreateCourseRequest},
    materials::{entities::MaterialType, requests::CreateMaterialRequest},
    messages::requests::SendMessageRequest,
    submissions::{
        entities::SubmissionStatus,
        requests::{GradeSubmissionRequest, SubmissionListQuery, SubmitAssignmentRequest},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;

async fn storage() -> SeaOrmStorage {
    let client = LmsClient::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory database should connect");
    SeaOrmStorage::from_client(client)
}

async fn user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            email: email.to_string(),
            password: "hash".to_string(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            role,
            avatar_url: None,
            bio: None,
        })
        .await
        .unwrap()
}

fn course_request(title: &str) -> CreateCourseRequest {
    CreateCourseRequest {
        teacher_id: None,
        title: title.to_string(),
        description: None,
        cover_image: None,
        is_published: true,
    }
}

fn assignment_request(title: &str, due_in_hours: i64, total_points: f64) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        title: title.to_string(),
        description: None,
        due_date: Utc::now() + Duration::hours(due_in_hours),
        total_points,
    }
}

fn submit_request(content: &str) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        content: Some(content.to_string()),
        file_url: None,
    }
}

#[tokio::test]
async fn test_user_crud_and_duplicate_email() {
    let storage = storage().await;
    let alice = user(&storage, "alice@lms.test", UserRole::Student).await;
    user(&storage, "bob@lms.test", UserRole::Teacher).await;

    let found = storage.get_user_by_email("alice@lms.test").await.unwrap();
    assert_eq!(found.map(|u| u.id), Some(alice.id));

    let duplicate = storage
        .create_user(CreateUserRequest {
            email: "alice@lms.test".to_string(),
            password: "hash".to_string(),
            name: "Alice 2".to_string(),
            role: UserRole::Student,
            avatar_url: None,
            bio: None,
        })
        .await;
    assert!(matches!(duplicate, Err(LmsError::UniqueConstraint(_))));

    let updated = storage
        .update_user(
            alice.id,
            UpdateUserRequest {
                name: Some("Alice Liddell".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Alice Liddell");
    assert_eq!(updated.email, "alice@lms.test");

    assert!(storage.update_user(9999, UpdateUserRequest::default()).await.unwrap().is_none());
    assert_eq!(storage.count_users(None).await.unwrap(), 2);
    assert_eq!(storage.count_users(Some(UserRole::Teacher)).await.unwrap(), 1);

    assert!(storage.delete_user(alice.id).await.unwrap());
    assert!(!storage.delete_user(alice.id).await.unwrap());
}

#[tokio::test]
async fn test_user_list_search_and_pagination() {
    let storage = storage().await;
    for i in 0..5 {
        user(&storage, &format!("student{i}@lms.test"), UserRole::Student).await;
    }
    user(&storage, "teacher@lms.test", UserRole::Teacher).await;

    let page = storage
        .list_users_with_pagination(UserListQuery {
            page: Some(2),
            size: Some(2),
            role: Some(UserRole::Student),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 3);

    // 超大页码返回空页
    let beyond = storage
        .list_users_with_pagination(UserListQuery {
            page: Some(i64::MAX),
            size: Some(100),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.pagination.total, 6);

    let search = storage
        .list_users_with_pagination(UserListQuery {
            search: Some("teacher".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(search.items.len(), 1);
    assert_eq!(search.items[0].role, UserRole::Teacher);
}

#[tokio::test]
async fn test_courses_and_student_courses() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let student = user(&storage, "s@lms.test", UserRole::Student).await;

    let rust = storage.create_course(teacher.id, course_request("Rust 101")).await.unwrap();
    storage.create_course(teacher.id, course_request("Go 101")).await.unwrap();

    let listed = storage
        .list_courses_with_pagination(CourseListQuery {
            search: Some("rust".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);

    storage.enroll_user(student.id, rust.id).await.unwrap();
    let mine = storage
        .list_student_courses_with_pagination(student.id, CourseListQuery::default())
        .await
        .unwrap();
    assert_eq!(mine.pagination.total, 1);
    assert_eq!(mine.items[0].id, rust.id);

    // 课程删除后选课级联删除
    assert!(storage.delete_course(rust.id).await.unwrap());
    assert!(storage.get_enrollment(student.id, rust.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_enrollment_conflict_and_progress_clamp() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let student = user(&storage, "s@lms.test", UserRole::Student).await;
    let course = storage.create_course(teacher.id, course_request("Rust")).await.unwrap();

    let enrollment = storage.enroll_user(student.id, course.id).await.unwrap();
    assert_eq!(enrollment.progress, 0.0);
    assert!(storage.get_progress(student.id, course.id).await.unwrap().is_some());

    let again = storage.enroll_user(student.id, course.id).await;
    assert!(matches!(again, Err(LmsError::Conflict(_))));

    let done = storage
        .update_enrollment_progress(student.id, course.id, 250.0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.progress, 100.0);
    assert!(done.is_completed());

    let back = storage
        .update_enrollment_progress(student.id, course.id, 40.0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(back.progress, 40.0);
    assert!(!back.is_completed());

    let listed = storage
        .list_course_enrollments_with_pagination(course.id, PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].user.as_ref().map(|u| u.id), Some(student.id));
    assert_eq!(storage.count_course_enrollments(course.id).await.unwrap(), 1);

    assert!(storage.unenroll_user(student.id, course.id).await.unwrap());
    assert!(storage.get_progress(student.id, course.id).await.unwrap().is_none());
    assert!(!storage.unenroll_user(student.id, course.id).await.unwrap());
}

#[tokio::test]
async fn test_materials_validation_and_order() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let course = storage.create_course(teacher.id, course_request("Rust")).await.unwrap();

    let missing_url = storage
        .create_material(
            course.id,
            CreateMaterialRequest {
                title: "Slides".to_string(),
                description: None,
                material_type: MaterialType::Link,
                url: None,
                content: None,
                position: None,
            },
        )
        .await;
    assert!(matches!(missing_url, Err(LmsError::Validation(_))));

    for title in ["Intro", "Ownership"] {
        storage
            .create_material(
                course.id,
                CreateMaterialRequest {
                    title: title.to_string(),
                    description: None,
                    material_type: MaterialType::Text,
                    url: None,
                    content: Some("...".to_string()),
                    position: None,
                },
            )
            .await
            .unwrap();
    }

    let materials = storage.list_course_materials(course.id).await.unwrap();
    let titles: Vec<&str> = materials.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "Ownership"]);
    assert_eq!(materials[0].position, 0);
    assert_eq!(materials[1].position, 1);
}

#[tokio::test]
async fn test_submission_flow_and_rollup() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let student = user(&storage, "s@lms.test", UserRole::Student).await;
    let course = storage.create_course(teacher.id, course_request("Rust")).await.unwrap();
    storage.enroll_user(student.id, course.id).await.unwrap();

    let open = storage
        .create_assignment(course.id, assignment_request("Open", 24, 50.0))
        .await
        .unwrap();
    let overdue = storage
        .create_assignment(course.id, assignment_request("Overdue", -24, 100.0))
        .await
        .unwrap();

    let progress = storage.get_progress(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(progress.total_assignments, 2);
    assert_eq!(progress.completed_assignments, 0);

    let first = storage
        .submit_assignment(open.id, student.id, submit_request("v1"))
        .await
        .unwrap();
    assert_eq!(first.status, SubmissionStatus::Submitted);

    // 批改前重新提交覆盖同一条记录
    let second = storage
        .submit_assignment(open.id, student.id, submit_request("v2"))
        .await
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.content.as_deref(), Some("v2"));

    let late = storage
        .submit_assignment(overdue.id, student.id, submit_request("late"))
        .await
        .unwrap();
    assert_eq!(late.status, SubmissionStatus::Late);

    let out_of_range = storage
        .grade_submission(
            second.id,
            GradeSubmissionRequest {
                grade: 51.0,
                feedback: None,
            },
        )
        .await;
    assert!(matches!(out_of_range, Err(LmsError::Validation(_))));

    let graded = storage
        .grade_submission(
            second.id,
            GradeSubmissionRequest {
                grade: 40.0,
                feedback: Some("good".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(graded.status, SubmissionStatus::Graded);
    assert!(graded.graded_at.is_some());

    let resubmit = storage
        .submit_assignment(open.id, student.id, submit_request("v3"))
        .await;
    assert!(matches!(resubmit, Err(LmsError::Conflict(_))));

    let progress = storage.get_progress(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(progress.completed_assignments, 2);
    assert_eq!(progress.overall_grade, Some(80.0));

    let enrollment = storage.get_enrollment(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(enrollment.progress, 100.0);
    assert!(enrollment.is_completed());

    let stats = storage.get_assignment_grade_stats(open.id).await.unwrap();
    assert_eq!(stats.graded_count, 1);
    assert_eq!(stats.average, Some(40.0));

    let breakdown = storage.get_submission_status_breakdown(overdue.id).await.unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].status, SubmissionStatus::Late);
    assert_eq!(breakdown[0].count, 1);

    let listed = storage
        .list_assignment_submissions_with_pagination(
            open.id,
            SubmissionListQuery {
                status: Some(SubmissionStatus::Graded),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].creator.as_ref().map(|c| c.id), Some(student.id));
}

#[tokio::test]
async fn test_assignment_changes_recompute_progress() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let student = user(&storage, "s@lms.test", UserRole::Student).await;
    let course = storage.create_course(teacher.id, course_request("Rust")).await.unwrap();
    storage.enroll_user(student.id, course.id).await.unwrap();

    let a = storage
        .create_assignment(course.id, assignment_request("A", 24, 10.0))
        .await
        .unwrap();
    let b = storage
        .create_assignment(course.id, assignment_request("B", 24, 10.0))
        .await
        .unwrap();
    storage
        .submit_assignment(a.id, student.id, submit_request("done"))
        .await
        .unwrap();

    let enrollment = storage.get_enrollment(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(enrollment.progress, 50.0);

    assert!(storage.delete_assignment(b.id).await.unwrap());
    let progress = storage.get_progress(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(progress.total_assignments, 1);
    assert_eq!(progress.completion_rate, 100.0);

    let invalid = storage
        .update_assignment(
            a.id,
            UpdateAssignmentRequest {
                total_points: Some(0.0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(LmsError::Validation(_))));
    assert!(
        storage
            .update_assignment(404, UpdateAssignmentRequest::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_total_points_cannot_drop_below_existing_grade() {
    let storage = storage().await;
    let teacher = user(&storage, "t@lms.test", UserRole::Teacher).await;
    let student = user(&storage, "s@lms.test", UserRole::Student).await;
    let course = storage.create_course(teacher.id, course_request("Rust")).await.unwrap();
    storage.enroll_user(student.id, course.id).await.unwrap();

    let assignment = storage
        .create_assignment(course.id, assignment_request("Essay", 24, 100.0))
        .await
        .unwrap();
    let submission = storage
        .submit_assignment(assignment.id, student.id, submit_request("essay"))
        .await
        .unwrap();
    storage
        .grade_submission(
            submission.id,
            GradeSubmissionRequest {
                grade: 90.0,
                feedback: None,
            },
        )
        .await
        .unwrap()
        .unwrap();

    let lowered = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                total_points: Some(10.0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(lowered, Err(LmsError::Validation(_))));

    let unchanged = storage.get_assignment(assignment.id).await.unwrap().unwrap();
    assert_eq!(unchanged.total_points, 100.0);
    let progress = storage.get_progress(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(progress.overall_grade, Some(90.0));

    // 不低于最高分时允许调整
    let adjusted = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                total_points: Some(90.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(adjusted.total_points, 90.0);
    let progress = storage.get_progress(student.id, course.id).await.unwrap().unwrap();
    assert_eq!(progress.overall_grade, Some(100.0));
}

#[tokio::test]
async fn test_messages_inbox_and_read_state() {
    let storage = storage().await;
    let alice = user(&storage, "alice@lms.test", UserRole::Student).await;
    let bob = user(&storage, "bob@lms.test", UserRole::Teacher).await;

    let message = storage
        .send_message(
            alice.id,
            SendMessageRequest {
                receiver_id: bob.id,
                subject: Some("Question".to_string()),
                content: "When is the exam?".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!message.is_read);
    assert_eq!(storage.count_unread_messages(bob.id).await.unwrap(), 1);

    // 发件人不能标记已读
    assert!(!storage.mark_message_read(message.id, alice.id).await.unwrap());
    assert!(storage.mark_message_read(message.id, bob.id).await.unwrap());
    assert!(storage.mark_message_read(message.id, bob.id).await.unwrap());
    assert_eq!(storage.count_unread_messages(bob.id).await.unwrap(), 0);

    let unread = storage
        .list_inbox_with_pagination(bob.id, PaginationQuery::default(), true)
        .await
        .unwrap();
    assert!(unread.items.is_empty());

    let sent = storage
        .list_sent_with_pagination(alice.id, PaginationQuery::default())
        .await
        .unwrap();
    assert_eq!(sent.pagination.total, 1);

    assert!(storage.delete_message(message.id).await.unwrap());
    assert!(storage.get_message(message.id).await.unwrap().is_none());
}
