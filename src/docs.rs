use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admin::model::{
    AssignSubjectsDto, AssignSubjectsResponse, CreateStudentDto, CreateSubjectDto,
    CreateTeacherDto, CreateUserResponse, StatsResponse, StudentWithEnrollments, StudentsResponse,
    SubjectResponse, SubjectsResponse, TeacherWithSubjects, TeachersResponse, UpdateStudentDto,
    UpdateSubjectDto, UpdateTeacherDto,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::student::model::{
    AvailableSubjectsResponse, EnrollRequest, EnrolledSubject, EnrolledSubjectsResponse,
    EnrollmentChangeResponse,
};
use crate::modules::subjects::model::{Subject, SubjectBrief, SubjectWithTeachers};
use crate::modules::teacher::model::{
    Assignment, AssignmentWithRelations, AssignmentsResponse, EnrolledStudent, FileType,
    MyEnrollmentsResponse, MyStudentsResponse, MySubjectsResponse, RosterStudent, SubjectRoster,
    UploadAssignmentResponse,
};
use crate::modules::users::model::{User, UserBrief, UserRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::admin::controller::get_stats,
        crate::modules::admin::controller::create_student,
        crate::modules::admin::controller::get_students,
        crate::modules::admin::controller::update_student,
        crate::modules::admin::controller::delete_student,
        crate::modules::admin::controller::create_teacher,
        crate::modules::admin::controller::get_teachers,
        crate::modules::admin::controller::update_teacher,
        crate::modules::admin::controller::delete_teacher,
        crate::modules::admin::controller::get_teachers_with_subjects,
        crate::modules::admin::controller::create_subject,
        crate::modules::admin::controller::get_subjects,
        crate::modules::admin::controller::update_subject,
        crate::modules::admin::controller::delete_subject,
        crate::modules::admin::controller::assign_subjects,
        crate::modules::teacher::controller::get_my_subjects,
        crate::modules::teacher::controller::get_my_students,
        crate::modules::teacher::controller::get_my_enrollments,
        crate::modules::teacher::controller::upload_assignment,
        crate::modules::teacher::controller::get_assignments,
        crate::modules::teacher::controller::delete_assignment,
        crate::modules::student::controller::get_available_subjects,
        crate::modules::student::controller::get_my_enrolled_subjects,
        crate::modules::student::controller::enroll,
        crate::modules::student::controller::unenroll,
    ),
    components(
        schemas(
            User,
            UserBrief,
            UserRole,
            Subject,
            SubjectBrief,
            SubjectWithTeachers,
            LoginRequest,
            LoginResponse,
            ErrorResponse,
            StatsResponse,
            CreateStudentDto,
            UpdateStudentDto,
            CreateTeacherDto,
            UpdateTeacherDto,
            CreateSubjectDto,
            UpdateSubjectDto,
            AssignSubjectsDto,
            AssignSubjectsResponse,
            CreateUserResponse,
            SubjectResponse,
            StudentsResponse,
            StudentWithEnrollments,
            TeachersResponse,
            TeacherWithSubjects,
            SubjectsResponse,
            Assignment,
            AssignmentWithRelations,
            AssignmentsResponse,
            UploadAssignmentResponse,
            FileType,
            RosterStudent,
            EnrolledStudent,
            SubjectRoster,
            MySubjectsResponse,
            MyStudentsResponse,
            MyEnrollmentsResponse,
            EnrollRequest,
            EnrolledSubject,
            AvailableSubjectsResponse,
            EnrolledSubjectsResponse,
            EnrollmentChangeResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Admin", description = "User, subject and assignment administration"),
        (name = "Teacher", description = "Teacher-scoped reads and coursework"),
        (name = "Student", description = "Catalog browsing and enrollment"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
