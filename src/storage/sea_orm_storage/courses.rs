use super::{SeaOrmStorage, found, page_params};
use crate::client::{FindManyArgs, Filter, SortOrder, UniqueWhere};
use crate::entity::course_enrollments::Column as EnrollmentColumn;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use sea_orm::Set;

impl SeaOrmStorage {
    pub async fn create_course_impl(
        &self,
        teacher_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            teacher_id: Set(teacher_id),
            cover_image: Set(req.cover_image),
            is_published: Set(req.is_published),
            ..Default::default()
        };

        Ok(self.client.course().create(model).await?.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = self
            .client
            .course()
            .find_unique(UniqueWhere::id(course_id))
            .await?;
        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let filter = course_filter(&query);
        self.paginate_courses(filter, query.page, query.size).await
    }

    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let mut changes = ActiveModel::default();
        if let Some(title) = update.title {
            changes.title = Set(title);
        }
        if let Some(description) = update.description {
            changes.description = Set(Some(description));
        }
        if let Some(cover_image) = update.cover_image {
            changes.cover_image = Set(Some(cover_image));
        }
        if let Some(is_published) = update.is_published {
            changes.is_published = Set(is_published);
        }

        let result = found(
            self.client
                .course()
                .update(UniqueWhere::id(course_id), changes)
                .await,
        )?;
        Ok(result.map(|m| m.into_course()))
    }

    /// 删除课程，选课、资料、作业等随外键级联删除
    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = found(self.client.course().delete(UniqueWhere::id(course_id)).await)?;
        Ok(result.is_some())
    }

    /// 分页列出学生已选的课程
    pub async fn list_student_courses_with_pagination_impl(
        &self,
        user_id: i64,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let course_ids: Vec<i64> = self
            .client
            .course_enrollment()
            .find_many(Filter::eq(EnrollmentColumn::UserId, user_id).into())
            .await?
            .into_iter()
            .map(|e| e.course_id)
            .collect();

        let filter = course_filter(&query).with(Filter::is_in(Column::Id, course_ids));
        self.paginate_courses(filter, query.page, query.size).await
    }

    async fn paginate_courses(
        &self,
        filter: Filter<Courses>,
        page: Option<i64>,
        size: Option<i64>,
    ) -> Result<CourseListResponse> {
        let (page, size) = page_params(page, size);

        let delegate = self.client.course();
        let total = delegate.count(filter.clone()).await?;
        let courses = delegate
            .find_many(
                FindManyArgs::new()
                    .filter(filter)
                    .order_by(Column::CreatedAt, SortOrder::Desc)
                    .order_by(Column::Id, SortOrder::Desc)
                    .paginate(page, size),
            )
            .await?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total as i64),
        })
    }
}

fn course_filter(query: &CourseListQuery) -> Filter<Courses> {
    let mut filter = Filter::all();
    if let Some(teacher_id) = query.teacher_id {
        filter = filter.with(Filter::eq(Column::TeacherId, teacher_id));
    }
    if let Some(is_published) = query.is_published {
        filter = filter.with(Filter::eq(Column::IsPublished, is_published));
    }
    if let Some(search) = query.search.as_deref().map(str::trim)
        && !search.is_empty()
    {
        filter = filter.with(Filter::or(vec![
            Filter::contains(Column::Title, search),
            Filter::contains(Column::Description, search),
        ]));
    }
    filter
}
