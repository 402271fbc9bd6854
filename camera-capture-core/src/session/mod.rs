pub mod camera;
pub mod capture;
pub mod device;
pub mod focus_flash;
pub mod record;

#[cfg(test)]
pub(crate) mod test_support;
