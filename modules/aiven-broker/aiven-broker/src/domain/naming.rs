/// Derives the Aiven service name for a platform instance.
///
/// The suffix is the CRC-32 (IEEE) checksum of the instance id as eight
/// lowercase hex digits, so a prefix of at most 27 characters keeps the name
/// well inside Aiven's 64 character limit.
pub fn build_service_name(prefix: &str, instance_id: &str) -> String {
    format!("{prefix}-{:08x}", crc32fast::hash(instance_id.as_bytes()))
}
