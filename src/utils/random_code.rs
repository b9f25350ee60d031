use rand::Rng;
use rand::distr::Alphanumeric;

/// 分享 token 长度：43 个字母数字字符，约 256 bit 熵（43 * log2(62) ≈ 256.03）
pub const SHARE_TOKEN_LENGTH: usize = 43;

/// 生成指定长度的随机字母数字串
///
/// 使用线程本地 CSPRNG（由操作系统熵源播种），结果可直接用于 URL。
pub fn generate_random_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// 生成文件分享 token
pub fn generate_share_token() -> String {
    generate_random_code(SHARE_TOKEN_LENGTH)
}
