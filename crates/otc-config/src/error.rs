use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No cloud credentials found. Set one of:\n\
        - OS_AUTH_URL with OS_USERNAME/OS_PASSWORD or OS_TOKEN\n\
        - OS_CLOUD naming an entry in clouds.yaml"
    )]
    NoCredentials,

    #[error(
        "clouds.yaml not found. Checked:\n\
        - OS_CLIENT_CONFIG_FILE\n\
        - ./clouds.yaml, ./clouds.yml\n\
        - ~/.config/openstack/clouds.yaml\n\
        - /etc/openstack/clouds.yaml"
    )]
    CloudsFileNotFound,

    #[error("Cloud '{0}' is not defined in clouds.yaml")]
    CloudNotDefined(String),

    #[error("Missing required setting: {0}")]
    MissingValue(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
