use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::create_token;
use crate::utils::password::verify_password;

use super::model::{LoginRequest, LoginResponse};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: Uuid,
            name: String,
            email: String,
            password: String,
            role: UserRole,
            phone: Option<String>,
            address: Option<String>,
            department: Option<String>,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, password, role, phone, address, department, \
                    created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        if !verify_password(&dto.password, &row.password)? {
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }

        let token = create_token(row.id, jwt_config)?;

        // The hash stays in the query-local row struct and is dropped here.
        let user = User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            phone: row.phone,
            address: row.address,
            department: row.department,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            user,
            token,
        })
    }
}
