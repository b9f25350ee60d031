use crate::config::Argon2Config;
use crate::errors::DriveError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// 密码哈希与校验（Argon2id）
#[derive(Clone)]
pub struct CredentialStore {
    params: Params,
}

impl CredentialStore {
    pub fn new(config: &Argon2Config) -> Result<Self, DriveError> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| DriveError::invalid_input(format!("Argon2 参数错误: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// 哈希密码
    pub fn hash(&self, password: &str) -> Result<String, DriveError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DriveError::invalid_input(format!("密码哈希失败: {e}")))?;
        Ok(hash.to_string())
    }

    /// 验证密码（参数取自哈希串本身）
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed_hash) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }
}
