use clap::{Parser, Subcommand};
use sozo_admin::Config;
use sozo_admin::auth::{CryptError, hash_password};
use sozo_admin::error::AppError;
use sozo_admin::form::{CourseForm, Difficulty};
use sozo_admin::model::entity::{
    Course, Module, ModuleCreate, UserEntity, UserEntityCreateUpdate, UserOrganizationRole,
};
use sozo_admin::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use sozo_admin::web::{AuthenticatedUser, UserRole};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for seeding the SoZO admin database", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        display_name: Option<String>,
        /// super_admin, admin, viewer or learner
        #[arg(long, default_value = "super_admin", value_parser = str::parse::<UserRole>)]
        role: UserRole,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// beginner, elementary, intermediate or advanced
        #[arg(long, default_value = "beginner", value_parser = str::parse::<Difficulty>)]
        difficulty: Difficulty,
        /// Repeat for several objectives
        #[arg(long)]
        objective: Vec<String>,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        /// Course title to attach the module to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
        #[arg(long)]
        estimated_minutes: Option<i32>,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    App(#[from] AppError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("crypt error: {0}")]
    Crypt(#[from] CryptError),
    #[error("course `{0}` not found")]
    CourseNotFound(String),
}

/// `DATABASE_URL` wins over the config file.
fn database_uri() -> Result<String, CliError> {
    if let Ok(uri) = std::env::var("DATABASE_URL") {
        return Ok(uri);
    }
    let config = Config::load(cfg!(debug_assertions)).map_err(AppError::from)?;
    Ok(config.app().database_uri().to_string())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&database_uri()?, Some(1))?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::system();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add {
                email,
                password,
                display_name,
                role,
            } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        email,
                        password_hash: hash_password(&password)?,
                        display_name,
                    },
                )
                .await?;
                let role = UserOrganizationRole::assign(&mm, &actor, user.id(), role).await?;
                println!("User created: {} <{}> ({})", user.id(), user.email(), role.role());
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add {
                title,
                description,
                difficulty,
                objective,
            } => {
                let form = CourseForm {
                    title,
                    description,
                    difficulty,
                    objectives: objective,
                    ..CourseForm::default()
                };
                let course = Course::create(&mm, &actor, form.to_payload()).await?;
                println!("Course created: {:?}", course);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add {
                course_title,
                title,
                description,
                order_index,
                estimated_minutes,
            } => {
                let course = Course::find_by_title(&mm, &actor, &course_title)
                    .await?
                    .ok_or(CliError::CourseNotFound(course_title))?;

                let module = Module::create(
                    &mm,
                    &actor,
                    ModuleCreate {
                        course_id: course.id(),
                        title,
                        description,
                        order_index: Some(order_index),
                        estimated_minutes,
                        is_active: None,
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },
    }

    Ok(())
}
