use std::io::Read;

/// Adapter feeding a `std::fs::File` into the core's embedded-io seam.
pub struct StdFile {
    inner: std::fs::File,
}

impl StdFile {
    pub fn new(inner: std::fs::File) -> Self {
        StdFile { inner }
    }
}

impl embedded_io::ErrorType for StdFile {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.inner.read(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            _ => embedded_io::ErrorKind::Other,
        })
    }
}
