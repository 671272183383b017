use sea_orm::{ActiveValue::NotSet, Set, Value};

use super::*;
use crate::config::DatabaseConfig;
use crate::entity::{
    assignment_submissions, assignments, course_enrollments, courses, messages, users,
};
use crate::errors::LmsError;

async fn client() -> LmsClient {
    LmsClient::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory database should connect")
}

fn new_user(email: &str, name: &str, role: &str) -> users::ActiveModel {
    users::ActiveModel {
        email: Set(email.to_string()),
        password_hash: Set("hash".to_string()),
        name: Set(name.to_string()),
        role: Set(role.to_string()),
        ..Default::default()
    }
}

fn new_course(title: &str, teacher_id: i64) -> courses::ActiveModel {
    courses::ActiveModel {
        title: Set(title.to_string()),
        teacher_id: Set(teacher_id),
        is_published: Set(true),
        ..Default::default()
    }
}

fn new_enrollment(user_id: i64, course_id: i64, progress: f64) -> course_enrollments::ActiveModel {
    course_enrollments::ActiveModel {
        user_id: Set(user_id),
        course_id: Set(course_id),
        progress: Set(progress),
        ..Default::default()
    }
}

/// 一名教师、一门课程、三名学生
async fn seed(client: &LmsClient) -> (users::Model, courses::Model, Vec<users::Model>) {
    let teacher = client
        .user()
        .create(new_user("teacher@lms.test", "Teacher", "teacher"))
        .await
        .unwrap();
    let course = client
        .course()
        .create(new_course("Rust 101", teacher.id))
        .await
        .unwrap();
    let mut students = Vec::new();
    for i in 1..=3 {
        let student = client
            .user()
            .create(new_user(
                &format!("student{i}@lms.test"),
                &format!("Student {i}"),
                "student",
            ))
            .await
            .unwrap();
        students.push(student);
    }
    (teacher, course, students)
}

#[tokio::test]
async fn test_create_stamps_timestamps_and_find_unique() {
    let client = client().await;
    let user = client
        .user()
        .create(new_user("alice@lms.test", "Alice", "student"))
        .await
        .unwrap();
    assert!(user.id > 0);
    assert!(user.created_at > 0);
    assert_eq!(user.created_at, user.updated_at);

    let by_id = client
        .user()
        .find_unique(UniqueWhere::id(user.id))
        .await
        .unwrap();
    assert_eq!(by_id.as_ref().map(|u| u.id), Some(user.id));

    let by_email = client
        .user()
        .find_unique(UniqueWhere::field(users::Column::Email, "alice@lms.test"))
        .await
        .unwrap();
    assert_eq!(by_email.map(|u| u.name), Some("Alice".to_string()));

    let missing = client
        .user()
        .find_unique(UniqueWhere::field(users::Column::Email, "nobody@lms.test"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_find_unique_rejects_non_unique_selector() {
    let client = client().await;
    let err = client
        .user()
        .find_unique(UniqueWhere::field(users::Column::Name, "Alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_find_unique_by_composite_key() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    client
        .course_enrollment()
        .create(new_enrollment(students[0].id, course.id, 10.0))
        .await
        .unwrap();

    let found = client
        .course_enrollment()
        .find_unique(
            UniqueWhere::field(course_enrollments::Column::UserId, students[0].id)
                .and(course_enrollments::Column::CourseId, course.id),
        )
        .await
        .unwrap();
    assert_eq!(found.map(|e| e.progress), Some(10.0));

    let err = client
        .course_enrollment()
        .find_unique_or_throw(
            UniqueWhere::field(course_enrollments::Column::UserId, students[1].id)
                .and(course_enrollments::Column::CourseId, course.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::RecordNotFound(_)));
}

#[tokio::test]
async fn test_duplicate_email_is_unique_violation() {
    let client = client().await;
    client
        .user()
        .create(new_user("dup@lms.test", "One", "student"))
        .await
        .unwrap();
    let err = client
        .user()
        .create(new_user("dup@lms.test", "Two", "student"))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::UniqueConstraint(_)), "{err:?}");
}

#[tokio::test]
async fn test_duplicate_enrollment_is_unique_violation() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    client
        .course_enrollment()
        .create(new_enrollment(students[0].id, course.id, 0.0))
        .await
        .unwrap();
    let err = client
        .course_enrollment()
        .create(new_enrollment(students[0].id, course.id, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::UniqueConstraint(_)), "{err:?}");
}

#[tokio::test]
async fn test_missing_parent_is_foreign_key_violation() {
    let client = client().await;
    let err = client
        .course()
        .create(new_course("Orphan", 9999))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::ForeignKeyConstraint(_)), "{err:?}");
}

#[tokio::test]
async fn test_create_many_skip_duplicates() {
    let client = client().await;
    client
        .user()
        .create(new_user("existing@lms.test", "Existing", "student"))
        .await
        .unwrap();

    assert_eq!(client.user().create_many(vec![], true).await.unwrap(), 0);

    let inserted = client
        .user()
        .create_many(
            vec![
                new_user("existing@lms.test", "Again", "student"),
                new_user("new1@lms.test", "New 1", "student"),
                new_user("new1@lms.test", "New 1 again", "student"),
                new_user("new2@lms.test", "New 2", "teacher"),
            ],
            true,
        )
        .await
        .unwrap();
    assert_eq!(inserted, 2);
    assert_eq!(client.user().count(Filter::all()).await.unwrap(), 3);

    let err = client
        .user()
        .create_many(vec![new_user("new2@lms.test", "Clash", "student")], false)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::UniqueConstraint(_)), "{err:?}");
}

#[tokio::test]
async fn test_update_only_touches_set_fields() {
    let client = client().await;
    let user = client
        .user()
        .create(new_user("bob@lms.test", "Bob", "student"))
        .await
        .unwrap();

    let updated = client
        .user()
        .update(
            UniqueWhere::id(user.id),
            users::ActiveModel {
                name: Set("Robert".to_string()),
                bio: Set(Some("hello".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Robert");
    assert_eq!(updated.bio.as_deref(), Some("hello"));
    assert_eq!(updated.email, "bob@lms.test");
    assert_eq!(updated.created_at, user.created_at);
    assert!(updated.updated_at >= user.updated_at);
}

#[tokio::test]
async fn test_update_and_delete_missing_row() {
    let client = client().await;
    let err = client
        .user()
        .update(
            UniqueWhere::id(42),
            users::ActiveModel {
                name: Set("Ghost".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::RecordNotFound(_)));

    let err = client.user().delete(UniqueWhere::id(42)).await.unwrap_err();
    assert!(matches!(err, LmsError::RecordNotFound(_)));
}

#[tokio::test]
async fn test_delete_returns_row_and_cascades() {
    let client = client().await;
    let (teacher, course, students) = seed(&client).await;
    client
        .course_enrollment()
        .create(new_enrollment(students[0].id, course.id, 0.0))
        .await
        .unwrap();

    let deleted = client.course().delete(UniqueWhere::id(course.id)).await.unwrap();
    assert_eq!(deleted.title, "Rust 101");
    assert_eq!(deleted.teacher_id, teacher.id);
    assert!(
        client
            .course()
            .find_unique(UniqueWhere::id(course.id))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(
        client.course_enrollment().count(Filter::all()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_update_many_and_delete_many() {
    let client = client().await;
    let (_, _, students) = seed(&client).await;

    let affected = client
        .user()
        .update_many(
            Filter::eq(users::Column::Role, "student"),
            users::ActiveModel {
                bio: Set(Some("bulk".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let with_bio = client
        .user()
        .count(Filter::eq(users::Column::Bio, "bulk"))
        .await
        .unwrap();
    assert_eq!(with_bio, 3);

    let removed = client
        .user()
        .delete_many(Filter::is_in(
            users::Column::Id,
            vec![students[0].id, students[1].id],
        ))
        .await
        .unwrap();
    assert_eq!(removed, 2);
    assert_eq!(client.user().count(Filter::all()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_upsert_creates_then_updates() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    let selector = UniqueWhere::field(course_enrollments::Column::UserId, students[0].id)
        .and(course_enrollments::Column::CourseId, course.id);

    let created = client
        .course_enrollment()
        .upsert(
            selector.clone(),
            new_enrollment(students[0].id, course.id, 5.0),
            course_enrollments::ActiveModel {
                progress: Set(50.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.progress, 5.0);

    let updated = client
        .course_enrollment()
        .upsert(
            selector,
            new_enrollment(students[0].id, course.id, 5.0),
            course_enrollments::ActiveModel {
                progress: Set(50.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.progress, 50.0);
    assert_eq!(
        client.course_enrollment().count(Filter::all()).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_filters_compose() {
    let client = client().await;
    let (teacher, _, students) = seed(&client).await;

    // teacher 或 (student 且邮箱不含 "2")
    let filter = Filter::or(vec![
        Filter::eq(users::Column::Role, "teacher"),
        Filter::and(vec![
            Filter::eq(users::Column::Role, "student"),
            Filter::not(Filter::contains(users::Column::Email, "2")),
        ]),
    ]);
    let found = client
        .user()
        .find_many(FindManyArgs::new().filter(filter).order_by(users::Column::Id, SortOrder::Asc))
        .await
        .unwrap();
    let ids: Vec<i64> = found.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![teacher.id, students[0].id, students[2].id]);

    let nothing = client
        .user()
        .find_many(Filter::or(vec![]).into())
        .await
        .unwrap();
    assert!(nothing.is_empty());

    let none_in = client
        .user()
        .count(Filter::is_in(users::Column::Id, Vec::<i64>::new()))
        .await
        .unwrap();
    assert_eq!(none_in, 0);

    let all_not_in = client
        .user()
        .count(Filter::not_in(users::Column::Id, Vec::<i64>::new()))
        .await
        .unwrap();
    assert_eq!(all_not_in, 4);

    let null_bio = client
        .user()
        .count(Filter::is_null(users::Column::Bio))
        .await
        .unwrap();
    assert_eq!(null_bio, 4);
}

#[tokio::test]
async fn test_like_metacharacters_match_literally() {
    let client = client().await;
    client
        .user()
        .create(new_user("a@lms.test", "100% done", "student"))
        .await
        .unwrap();
    client
        .user()
        .create(new_user("b@lms.test", "1000 done", "student"))
        .await
        .unwrap();
    client
        .user()
        .create(new_user("c@lms.test", "snake_case", "student"))
        .await
        .unwrap();
    client
        .user()
        .create(new_user("d@lms.test", "snakeXcase", "student"))
        .await
        .unwrap();

    let percent = client
        .user()
        .count(Filter::contains(users::Column::Name, "0%"))
        .await
        .unwrap();
    assert_eq!(percent, 1);

    let underscore = client
        .user()
        .count(Filter::starts_with(users::Column::Name, "snake_"))
        .await
        .unwrap();
    assert_eq!(underscore, 1);

    let suffix = client
        .user()
        .count(Filter::ends_with(users::Column::Name, "done"))
        .await
        .unwrap();
    assert_eq!(suffix, 2);
}

#[tokio::test]
async fn test_find_many_order_skip_take_distinct() {
    let client = client().await;
    let (_, _, students) = seed(&client).await;

    let page = client
        .user()
        .find_many(
            FindManyArgs::new()
                .filter(Filter::eq(users::Column::Role, "student"))
                .order_by(users::Column::Email, SortOrder::Desc)
                .skip(1)
                .take(1),
        )
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, students[1].id);

    let roles = client
        .user()
        .find_many(
            FindManyArgs::new()
                .order_by(users::Column::Id, SortOrder::Asc)
                .distinct(users::Column::Role),
        )
        .await
        .unwrap();
    let roles: Vec<&str> = roles.iter().map(|u| u.role.as_str()).collect();
    assert_eq!(roles, vec!["teacher", "student"]);

    let first = client
        .user()
        .find_first(
            FindManyArgs::new()
                .filter(Filter::eq(users::Column::Role, "student"))
                .order_by(users::Column::Id, SortOrder::Desc),
        )
        .await
        .unwrap();
    assert_eq!(first.map(|u| u.id), Some(students[2].id));

    let err = client
        .user()
        .find_first_or_throw(Filter::eq(users::Column::Role, "admin").into())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_aggregate_enrollment_progress() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    for (student, progress) in students.iter().zip([20.0, 40.0, 90.0]) {
        client
            .course_enrollment()
            .create(new_enrollment(student.id, course.id, progress))
            .await
            .unwrap();
    }

    let result = client
        .course_enrollment()
        .aggregate(
            AggregateArgs::new()
                .filter(Filter::eq(course_enrollments::Column::CourseId, course.id))
                .count()
                .avg(course_enrollments::Column::Progress)
                .min(course_enrollments::Column::Progress)
                .max(course_enrollments::Column::Progress)
                .sum(course_enrollments::Column::Progress),
        )
        .await
        .unwrap();
    assert_eq!(result.count, Some(3));
    assert_eq!(result.avg_of("progress"), Some(50.0));
    assert_eq!(result.min_of("progress"), Some(20.0));
    assert_eq!(result.max_of("progress"), Some(90.0));
    assert_eq!(result.sum_of("progress"), Some(150.0));

    // 无匹配行时 count 为 0，其余为空
    let empty = client
        .course_enrollment()
        .aggregate(
            AggregateArgs::new()
                .filter(Filter::eq(course_enrollments::Column::CourseId, 9999))
                .count()
                .avg(course_enrollments::Column::Progress),
        )
        .await
        .unwrap();
    assert_eq!(empty.count, Some(0));
    assert_eq!(empty.avg_of("progress"), None);
}

#[tokio::test]
async fn test_aggregate_without_filter_reads_requested_columns_only() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    for (student, progress) in students.iter().zip([10.0, 30.0, 50.0]) {
        client
            .course_enrollment()
            .create(new_enrollment(student.id, course.id, progress))
            .await
            .unwrap();
    }

    let result = client
        .course_enrollment()
        .aggregate(
            AggregateArgs::new()
                .count()
                .avg(course_enrollments::Column::Progress),
        )
        .await
        .unwrap();
    assert_eq!(result.count, Some(3));
    assert_eq!(result.avg_of("progress"), Some(30.0));
    assert_eq!(result.avg.len(), 1);
    assert!(result.sum.is_empty() && result.min.is_empty() && result.max.is_empty());

    // 不要求 count 时结果中没有 _count
    let no_count = client
        .course_enrollment()
        .aggregate(AggregateArgs::new().max(course_enrollments::Column::Progress))
        .await
        .unwrap();
    assert_eq!(no_count.count, None);
    assert_eq!(no_count.max_of("progress"), Some(50.0));
}

#[tokio::test]
async fn test_aggregate_rejects_bad_requests() {
    let client = client().await;
    let err = client
        .user()
        .aggregate(AggregateArgs::new().avg(users::Column::Email))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));

    let err = client
        .user()
        .aggregate(AggregateArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_group_by_submission_status() {
    let client = client().await;
    let (_, course, students) = seed(&client).await;
    let assignment = client
        .assignment()
        .create(assignments::ActiveModel {
            course_id: Set(course.id),
            title: Set("Homework 1".to_string()),
            due_date: Set(chrono::Utc::now().timestamp() + 3600),
            total_points: Set(100.0),
            ..Default::default()
        })
        .await
        .unwrap();

    for (student, (status, grade)) in students.iter().zip([
        ("graded", Some(80.0)),
        ("graded", Some(60.0)),
        ("submitted", None),
    ]) {
        client
            .assignment_submission()
            .create(assignment_submissions::ActiveModel {
                assignment_id: Set(assignment.id),
                user_id: Set(student.id),
                content: Set(Some("answer".to_string())),
                status: Set(status.to_string()),
                grade: Set(grade),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let groups = client
        .assignment_submission()
        .group_by(
            GroupByArgs::by(vec![assignment_submissions::Column::Status])
                .filter(Filter::eq(
                    assignment_submissions::Column::AssignmentId,
                    assignment.id,
                ))
                .count()
                .avg(assignment_submissions::Column::Grade)
                .order_by(assignment_submissions::Column::Status, SortOrder::Asc),
        )
        .await
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].key_str("status"), Some("graded"));
    assert_eq!(groups[0].aggregates.count, Some(2));
    assert_eq!(groups[0].aggregates.avg_of("grade"), Some(70.0));
    assert_eq!(groups[0].aggregates.avg.len(), 1);
    assert_eq!(groups[1].key_str("status"), Some("submitted"));
    assert_eq!(groups[1].aggregates.count, Some(1));
    assert_eq!(groups[1].aggregates.avg_of("grade"), None);

    let err = client
        .assignment_submission()
        .group_by(GroupByArgs::by(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));

    let err = client
        .assignment_submission()
        .group_by(
            GroupByArgs::by(vec![assignment_submissions::Column::Status])
                .order_by(assignment_submissions::Column::Grade, SortOrder::Asc),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_raw_round_trip() {
    let client = client().await;
    let (teacher, _, _) = seed(&client).await;

    let rows = client
        .user()
        .find_raw(Some("role = ?"), vec![Value::from("teacher")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "teacher@lms.test");
    assert_eq!(rows[0]["id"], teacher.id);

    let all = client.user().find_raw(None, vec![]).await.unwrap();
    assert_eq!(all.len(), 4);

    let grouped = client
        .user()
        .aggregate_raw("role", Some("GROUP BY role ORDER BY role"), vec![])
        .await
        .unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[0]["role"], "student");

    let result = client
        .run_command_raw(
            "UPDATE users SET bio = ? WHERE role = ?",
            vec![Value::from("raw"), Value::from("student")],
        )
        .await
        .unwrap();
    assert_eq!(result.rows_affected, 3);

    let bios = client
        .user()
        .count(Filter::eq(users::Column::Bio, "raw"))
        .await
        .unwrap();
    assert_eq!(bios, 3);

    let err = client
        .user()
        .aggregate_raw("  ", None, vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidQuery(_)));
}

#[tokio::test]
async fn test_transaction_commit_and_rollback() {
    let client = client().await;
    let (teacher, _, students) = seed(&client).await;

    let txn = client.begin().await.unwrap();
    txn.message()
        .create(messages::ActiveModel {
            sender_id: Set(teacher.id),
            receiver_id: Set(students[0].id),
            subject: NotSet,
            content: Set("dropped".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    txn.rollback().await.unwrap();
    assert_eq!(client.message().count(Filter::all()).await.unwrap(), 0);

    let txn = client.begin().await.unwrap();
    let kept = txn
        .message()
        .create(messages::ActiveModel {
            sender_id: Set(teacher.id),
            receiver_id: Set(students[0].id),
            content: Set("kept".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    txn.commit().await.unwrap();

    let stored = client
        .message()
        .find_unique_or_throw(UniqueWhere::id(kept.id))
        .await
        .unwrap();
    assert!(!stored.is_read);
    assert!(stored.created_at > 0);
}

#[test]
fn test_build_database_url() {
    assert_eq!(
        LmsClient::build_database_url("lms.db").unwrap(),
        "sqlite://lms.db?mode=rwc"
    );
    assert_eq!(
        LmsClient::build_database_url(":memory:").unwrap(),
        "sqlite::memory:"
    );
    assert!(LmsClient::build_database_url("postgres://localhost/lms").is_ok());
    let err = LmsClient::build_database_url("oracle://nope").unwrap_err();
    assert!(matches!(err, LmsError::DatabaseConfig(_)));
}
