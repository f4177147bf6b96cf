use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 生成 4 位 base36 随机后缀
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// 券实例的展示码：模板码 + 4 位随机后缀
pub fn display_code(template_code: &str) -> String {
    format!("{}-{}", template_code, random_suffix(4))
}
