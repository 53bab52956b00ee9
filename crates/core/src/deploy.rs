//! Cloud deployment descriptors.
//!
//! Every descriptor is rendered from one static [`DeploymentConfig`] table.
//! Rendering is pure; the ops tool decides where the files land.

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Configuration table
// ---------------------------------------------------------------------------

/// Managed PostgreSQL instance settings.
#[derive(Debug, Clone)]
pub struct RdsConfig {
    pub instance_class: String,
    pub storage_gb: u32,
    pub engine: String,
    pub engine_version: String,
    pub parameter_group: String,
    pub database_name: String,
    pub master_username: String,
    pub port: u16,
}

/// Application platform settings for the API.
#[derive(Debug, Clone)]
pub struct BeanstalkConfig {
    pub application_name: String,
    pub environment_name: String,
    pub solution_stack: String,
    pub instance_type: String,
    pub min_instances: u32,
    pub max_instances: u32,
}

/// Static site hosting for the frontend.
#[derive(Debug, Clone)]
pub struct FrontendHosting {
    pub bucket: String,
    pub index_document: String,
    pub error_document: String,
}

/// The single source every descriptor is generated from.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub region: String,
    /// Port the API container listens on.
    pub api_port: u16,
    /// Name of the API binary inside the container image.
    pub api_binary: String,
    pub rds: RdsConfig,
    pub beanstalk: BeanstalkConfig,
    pub frontend: FrontendHosting,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".into(),
            api_port: 8000,
            api_binary: "databridge-api".into(),
            rds: RdsConfig {
                instance_class: "db.t3.micro".into(),
                storage_gb: 20,
                engine: "postgres".into(),
                engine_version: "14.6".into(),
                parameter_group: "default.postgres14".into(),
                database_name: "databridge".into(),
                master_username: "dbadmin".into(),
                port: 5432,
            },
            beanstalk: BeanstalkConfig {
                application_name: "databridge-api".into(),
                environment_name: "databridge-api-prod".into(),
                solution_stack: "64bit Amazon Linux 2023 v4.3.0 running Docker".into(),
                instance_type: "t3.micro".into(),
                min_instances: 1,
                max_instances: 4,
            },
            frontend: FrontendHosting {
                bucket: "databridge-frontend".into(),
                index_document: "index.html".into(),
                error_document: "error.html".into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Descriptor files
// ---------------------------------------------------------------------------

pub const TERRAFORM_FILE: &str = "terraform_aws_databridge.tf.json";
pub const CLOUDFORMATION_FILE: &str = "cloudformation_databridge.json";
pub const AMPLIFY_FILE: &str = "amplify_config.json";
pub const PLATFORM_CONFIG_FILE: &str = "eb-config.yml";
pub const DOCKERFILE: &str = "Dockerfile.aws";
pub const DEPLOY_SCRIPT_FILE: &str = "deploy_aws.sh";

/// A rendered descriptor ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub file_name: &'static str,
    pub contents: String,
    /// Whether the file should carry the executable bit.
    pub executable: bool,
}

/// Render every descriptor from `config`.
pub fn render_all(config: &DeploymentConfig) -> Vec<Descriptor> {
    vec![
        json_descriptor(TERRAFORM_FILE, &terraform(config)),
        json_descriptor(CLOUDFORMATION_FILE, &cloudformation(config)),
        json_descriptor(AMPLIFY_FILE, &amplify(config)),
        Descriptor {
            file_name: PLATFORM_CONFIG_FILE,
            contents: platform_config(config),
            executable: false,
        },
        Descriptor {
            file_name: DOCKERFILE,
            contents: dockerfile(config),
            executable: false,
        },
        Descriptor {
            file_name: DEPLOY_SCRIPT_FILE,
            contents: deploy_script(config),
            executable: true,
        },
    ]
}

fn json_descriptor(file_name: &'static str, value: &Value) -> Descriptor {
    // `Value` serialization cannot fail: all keys are strings.
    let mut contents = serde_json::to_string_pretty(value).unwrap_or_default();
    contents.push('\n');
    Descriptor {
        file_name,
        contents,
        executable: false,
    }
}

/// Terraform JSON configuration: database, frontend bucket, API platform.
pub fn terraform(config: &DeploymentConfig) -> Value {
    let rds = &config.rds;
    let eb = &config.beanstalk;
    let env_setting = |name: &str, value: &str| {
        json!({
            "namespace": "aws:elasticbeanstalk:application:environment",
            "name": name,
            "value": value,
        })
    };

    json!({
        "provider": {
            "aws": { "region": config.region }
        },
        "resource": {
            "aws_db_instance": {
                "databridge_postgres": {
                    "allocated_storage": rds.storage_gb,
                    "engine": rds.engine,
                    "engine_version": rds.engine_version,
                    "instance_class": rds.instance_class,
                    "db_name": rds.database_name,
                    "username": rds.master_username,
                    "password": "${var.db_password}",
                    "parameter_group_name": rds.parameter_group,
                    "skip_final_snapshot": true,
                    "publicly_accessible": true
                }
            },
            "aws_s3_bucket": {
                "databridge_frontend": {
                    "bucket": config.frontend.bucket,
                    "acl": "public-read",
                    "website": {
                        "index_document": config.frontend.index_document,
                        "error_document": config.frontend.error_document
                    }
                }
            },
            "aws_elastic_beanstalk_application": {
                "databridge_api": {
                    "name": eb.application_name,
                    "description": "DataBridge API Application"
                }
            },
            "aws_elastic_beanstalk_environment": {
                "databridge_api_env": {
                    "name": eb.environment_name,
                    "application": "${aws_elastic_beanstalk_application.databridge_api.name}",
                    "solution_stack_name": eb.solution_stack,
                    "setting": [
                        {
                            "namespace": "aws:autoscaling:launchconfiguration",
                            "name": "InstanceType",
                            "value": eb.instance_type
                        },
                        env_setting("DB_HOST", "${aws_db_instance.databridge_postgres.address}"),
                        env_setting("DB_USER", "${aws_db_instance.databridge_postgres.username}"),
                        env_setting("DB_PASSWORD", "${var.db_password}"),
                        env_setting("DB_NAME", "${aws_db_instance.databridge_postgres.db_name}"),
                        env_setting("ENVIRONMENT", "production")
                    ]
                }
            }
        },
        "output": {
            "postgres_endpoint": {
                "value": "${aws_db_instance.databridge_postgres.endpoint}"
            },
            "api_endpoint": {
                "value": "${aws_elastic_beanstalk_environment.databridge_api_env.cname}"
            },
            "frontend_url": {
                "value": "${aws_s3_bucket.databridge_frontend.website_endpoint}"
            }
        },
        "variable": {
            "db_password": {
                "description": "PostgreSQL master password",
                "type": "string",
                "sensitive": true
            }
        }
    })
}

/// CloudFormation template: database instance plus public frontend bucket.
pub fn cloudformation(config: &DeploymentConfig) -> Value {
    let rds = &config.rds;
    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": "DataBridge Bank Infrastructure",
        "Parameters": {
            "DBPassword": {
                "NoEcho": "true",
                "Description": "PostgreSQL database password",
                "Type": "String",
                "MinLength": "8",
                "MaxLength": "41",
                "AllowedPattern": "[a-zA-Z0-9]*",
                "ConstraintDescription": "must contain only alphanumeric characters"
            }
        },
        "Resources": {
            "PostgreSQLInstance": {
                "Type": "AWS::RDS::DBInstance",
                "Properties": {
                    "AllocatedStorage": rds.storage_gb.to_string(),
                    "DBInstanceClass": rds.instance_class,
                    "Engine": rds.engine,
                    "EngineVersion": rds.engine_version,
                    "MasterUsername": rds.master_username,
                    "MasterUserPassword": { "Ref": "DBPassword" },
                    "DBName": rds.database_name,
                    "Port": rds.port.to_string(),
                    "PubliclyAccessible": true
                }
            },
            "DataBridgeFrontendBucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": {
                    "AccessControl": "PublicRead",
                    "WebsiteConfiguration": {
                        "IndexDocument": config.frontend.index_document,
                        "ErrorDocument": config.frontend.error_document
                    }
                }
            },
            "BucketPolicy": {
                "Type": "AWS::S3::BucketPolicy",
                "Properties": {
                    "PolicyDocument": {
                        "Id": "PublicReadPolicy",
                        "Version": "2012-10-17",
                        "Statement": [
                            {
                                "Sid": "PublicReadGetObject",
                                "Effect": "Allow",
                                "Principal": "*",
                                "Action": "s3:GetObject",
                                "Resource": {
                                    "Fn::Join": [
                                        "",
                                        ["arn:aws:s3:::", { "Ref": "DataBridgeFrontendBucket" }, "/*"]
                                    ]
                                }
                            }
                        ]
                    },
                    "Bucket": { "Ref": "DataBridgeFrontendBucket" }
                }
            }
        },
        "Outputs": {
            "WebsiteURL": {
                "Description": "URL for the DataBridge frontend",
                "Value": { "Fn::GetAtt": ["DataBridgeFrontendBucket", "WebsiteURL"] }
            },
            "PostgreSQLEndpoint": {
                "Description": "Endpoint of the PostgreSQL database",
                "Value": { "Fn::GetAtt": ["PostgreSQLInstance", "Endpoint.Address"] }
            }
        }
    })
}

/// Amplify project configuration (frontend + API gateway + database).
pub fn amplify(config: &DeploymentConfig) -> Value {
    let rds = &config.rds;
    json!({
        "providers": {
            "awscloudformation": {
                "AuthRoleName": "databridge-auth-role",
                "UnauthRoleName": "databridge-unauth-role",
                "AuthRoleArn": "arn:aws:iam::ACCOUNT_ID:role/databridge-auth-role",
                "UnauthRoleArn": "arn:aws:iam::ACCOUNT_ID:role/databridge-unauth-role",
                "Region": config.region,
                "DeploymentBucketName": "databridge-deployment",
                "StackName": "databridge-amplify-stack",
                "StackId": "STACK_ID"
            }
        },
        "api": {
            "restapi": {
                "service": "API Gateway",
                "paths": {
                    "/api": { "lambdaFunction": "databridgeFunction" }
                }
            }
        },
        "function": {
            "databridgeFunction": {
                "build": true,
                "providerPlugin": "awscloudformation",
                "service": "Lambda",
                "dependsOn": [
                    {
                        "category": "storage",
                        "resourceName": "databridgedb",
                        "attributes": ["Name"]
                    }
                ]
            }
        },
        "storage": {
            "databridgedb": {
                "service": "RDS",
                "providerPlugin": "awscloudformation",
                "engine": rds.engine,
                "engineVersion": rds.engine_version,
                "instanceClass": rds.instance_class,
                "storagetype": "gp2",
                "allocatedstorage": rds.storage_gb,
                "name": rds.database_name,
                "username": rds.master_username
            },
            "databridgestorage": {
                "service": "S3",
                "providerPlugin": "awscloudformation"
            }
        }
    })
}

/// Application platform option settings (YAML). Placeholders are replaced
/// by the deploy script once the database endpoint is known.
pub fn platform_config(config: &DeploymentConfig) -> String {
    let eb = &config.beanstalk;
    format!(
        "# Elastic Beanstalk configuration
option_settings:
  aws:elasticbeanstalk:application:environment:
    HOST: 0.0.0.0
    PORT: \"{port}\"
    DB_HOST: RDS_ENDPOINT_PLACEHOLDER
    DB_USER: RDS_USERNAME_PLACEHOLDER
    DB_PASSWORD: RDS_PASSWORD_PLACEHOLDER
    DB_NAME: RDS_DATABASE_PLACEHOLDER
    ENVIRONMENT: production
    RUST_LOG: databridge_api=info,tower_http=info
  aws:elasticbeanstalk:environment:
    EnvironmentType: LoadBalanced
  aws:autoscaling:launchconfiguration:
    InstanceType: {instance}
    SecurityGroups: SECURITY_GROUP_PLACEHOLDER
  aws:autoscaling:asg:
    MinSize: {min}
    MaxSize: {max}
",
        port = config.api_port,
        instance = eb.instance_type,
        min = eb.min_instances,
        max = eb.max_instances,
    )
}

/// Multi-stage container build for the API binary.
pub fn dockerfile(config: &DeploymentConfig) -> String {
    format!(
        "FROM rust:1-slim AS build
WORKDIR /src
COPY . .
RUN cargo build --release --bin {bin}

FROM debian:bookworm-slim
COPY --from=build /src/target/release/{bin} /usr/local/bin/{bin}
ENV HOST=0.0.0.0 PORT={port}
EXPOSE {port}
CMD [\"{bin}\"]
",
        bin = config.api_binary,
        port = config.api_port,
    )
}

/// Shell script that provisions the stack with the AWS CLI.
pub fn deploy_script(config: &DeploymentConfig) -> String {
    let rds = &config.rds;
    let eb = &config.beanstalk;
    format!(
        r#"#!/bin/bash
# Provision the DataBridge stack with the AWS CLI.
set -euo pipefail

echo "Checking AWS CLI..."
if ! command -v aws &> /dev/null; then
    echo "AWS CLI not found. Install it and run 'aws configure' first."
    exit 1
fi

DB_PASSWORD=$(aws secretsmanager get-secret-value --secret-id databridge/db/password --query SecretString --output text)
AWS_ACCOUNT_ID=$(aws sts get-caller-identity --query Account --output text)
BUCKET="{bucket}-$AWS_ACCOUNT_ID"

echo "Creating frontend bucket $BUCKET..."
aws s3 mb "s3://$BUCKET" --region {region}
aws s3 sync ./frontend "s3://$BUCKET" --acl public-read

echo "Creating PostgreSQL instance..."
aws rds create-db-instance \
  --db-instance-identifier databridge-postgres \
  --db-instance-class {instance_class} \
  --engine {engine} \
  --master-username {username} \
  --master-user-password "$DB_PASSWORD" \
  --allocated-storage {storage} \
  --db-name {database} \
  --region {region} > /dev/null

echo "Waiting for the database to become available..."
aws rds wait db-instance-available --db-instance-identifier databridge-postgres
RDS_ENDPOINT=$(aws rds describe-db-instances \
  --db-instance-identifier databridge-postgres \
  --query "DBInstances[0].Endpoint.Address" \
  --output text)

sed -i "s/RDS_ENDPOINT_PLACEHOLDER/$RDS_ENDPOINT/g" {platform_file}
sed -i "s/RDS_USERNAME_PLACEHOLDER/{username}/g" {platform_file}
sed -i "s/RDS_PASSWORD_PLACEHOLDER/$DB_PASSWORD/g" {platform_file}
sed -i "s/RDS_DATABASE_PLACEHOLDER/{database}/g" {platform_file}

echo "Creating API application..."
aws elasticbeanstalk create-application --application-name {app}
EB_CNAME=$(aws elasticbeanstalk create-environment \
  --application-name {app} \
  --environment-name {env} \
  --solution-stack-name "{stack}" \
  --option-settings file://{platform_file} \
  --query "CNAME" \
  --output text)

echo "=== DEPLOY COMPLETE ==="
echo "Frontend: http://$BUCKET.s3-website-{region}.amazonaws.com"
echo "API: http://$EB_CNAME/api/v1"
"#,
        bucket = config.frontend.bucket,
        region = config.region,
        instance_class = rds.instance_class,
        engine = rds.engine,
        username = rds.master_username,
        storage = rds.storage_gb,
        database = rds.database_name,
        platform_file = PLATFORM_CONFIG_FILE,
        app = eb.application_name,
        env = eb.environment_name,
        stack = eb.solution_stack,
    )
}

// ---------------------------------------------------------------------------
// Operator checklist
// ---------------------------------------------------------------------------

/// Step-by-step deployment checklist for `config`.
pub fn instructions(config: &DeploymentConfig) -> String {
    let rds = &config.rds;
    let eb = &config.beanstalk;
    let site = &config.frontend;
    format!(
        "\
DataBridge deployment checklist
===============================

1. Prerequisites
   - An AWS account with permission to create RDS, S3, Elastic Beanstalk and CloudFront resources
   - AWS CLI installed and configured (`aws configure`)

2. Choose a path
   A. Scripted:   run ./{script} (requires the AWS CLI)
   B. Terraform:  terraform init && terraform apply (uses {terraform})
   C. CloudFormation: aws cloudformation deploy --template-file {cloudformation} --stack-name databridge
   D. Console:    follow section 3 by hand

3. Manual steps
   3.1 Database (RDS)
       - Create a {engine} {engine_version} instance ({instance_class}, {storage_gb} GB) in {region}
       - Database name {database}, master user {username}, port {db_port}
       - Note the endpoint; it becomes DB_HOST
   3.2 API ({application})
       - Build the image from {dockerfile}; the API listens on port {api_port}
       - Create environment {environment} ({instance_type}, {min}-{max} instances), settings in {eb_config}
       - Set the variables printed by `databridge-ops deploy env`
   3.3 Frontend
       - Create bucket {bucket} with static website hosting ({index} / {error})
       - Upload the frontend directory; see {amplify} for the Amplify alternative
       - Optionally front the bucket with CloudFront for HTTPS

4. Verify
   - GET <api-url>/health returns {{\"status\": \"ok\"}}
   - GET <api-url>/api/v1/health lists the subsystems
   - The frontend loads from the bucket or CloudFront URL

5. Operate
   - Enable automated RDS backups and CloudWatch alarms
   - Keep DB_PASSWORD in a secrets manager, never in the repository
",
        script = DEPLOY_SCRIPT_FILE,
        terraform = TERRAFORM_FILE,
        cloudformation = CLOUDFORMATION_FILE,
        engine = rds.engine,
        engine_version = rds.engine_version,
        instance_class = rds.instance_class,
        storage_gb = rds.storage_gb,
        region = config.region,
        database = rds.database_name,
        username = rds.master_username,
        db_port = rds.port,
        application = eb.application_name,
        dockerfile = DOCKERFILE,
        api_port = config.api_port,
        environment = eb.environment_name,
        instance_type = eb.instance_type,
        min = eb.min_instances,
        max = eb.max_instances,
        eb_config = PLATFORM_CONFIG_FILE,
        bucket = site.bucket,
        index = site.index_document,
        error = site.error_document,
        amplify = AMPLIFY_FILE,
    )
}

// ---------------------------------------------------------------------------
// Platform environment
// ---------------------------------------------------------------------------

/// The placeholder printed instead of a sensitive value.
pub const REDACTED_VALUE: &str = "****";

/// Key fragments that mark an environment variable as sensitive.
const SENSITIVE_FRAGMENTS: &[&str] = &["PASSWORD", "SECRET", "KEY"];

/// Environment variables the API expects on the deployment platform.
///
/// `db_host` and `db_password` are supplied by the caller because they are
/// only known once the database exists.
pub fn platform_env_vars(
    config: &DeploymentConfig,
    db_host: &str,
    db_password: &str,
) -> Vec<(String, String)> {
    vec![
        ("DB_HOST".into(), db_host.into()),
        ("DB_PORT".into(), config.rds.port.to_string()),
        ("DB_USER".into(), config.rds.master_username.clone()),
        ("DB_PASSWORD".into(), db_password.into()),
        ("DB_NAME".into(), config.rds.database_name.clone()),
        ("PORT".into(), config.api_port.to_string()),
        ("ENVIRONMENT".into(), "production".into()),
    ]
}

/// Whether `key` names a value that must never be printed.
pub fn is_sensitive_key(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    SENSITIVE_FRAGMENTS.iter().any(|f| upper.contains(f))
}

/// Replace the values of sensitive keys with [`REDACTED_VALUE`].
pub fn mask_sensitive(vars: &[(String, String)]) -> Vec<(String, String)> {
    vars.iter()
        .map(|(k, v)| {
            let value = if is_sensitive_key(k) {
                REDACTED_VALUE.to_string()
            } else {
                v.clone()
            };
            (k.clone(), value)
        })
        .collect()
}
