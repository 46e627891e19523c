use super::{Address, Fault};

/// ## Loadable bytecode
///
/// The code region plus the two entry points: the line collector and
/// the statement executor. On disk the entry points trail the code as
/// two little-endian words.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    code: Vec<u8>,
    collector: Address,
    executor: Address,
}

impl Image {
    pub fn new(code: Vec<u8>, collector: Address, executor: Address) -> Result<Image, Fault> {
        if collector >= code.len() || executor >= code.len() {
            return Err(Fault::BadImage);
        }
        Ok(Image {
            code,
            collector,
            executor,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Image, Fault> {
        if bytes.len() < 4 {
            return Err(Fault::BadImage);
        }
        let (code, trailer) = bytes.split_at(bytes.len() - 4);
        let collector = u16::from_le_bytes([trailer[0], trailer[1]]) as Address;
        let executor = u16::from_le_bytes([trailer[2], trailer[3]]) as Address;
        Image::new(code.to_vec(), collector, executor)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.code.clone();
        bytes.extend_from_slice(&(self.collector as u16).to_le_bytes());
        bytes.extend_from_slice(&(self.executor as u16).to_le_bytes());
        bytes
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn collector(&self) -> Address {
        self.collector
    }

    pub fn executor(&self) -> Address {
        self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailer() {
        let image = Image::from_bytes(&[28, 29, 34, 0, 0, 1, 0]).unwrap();
        assert_eq!(image.code(), &[28, 29, 34]);
        assert_eq!(image.collector(), 0);
        assert_eq!(image.executor(), 1);
        assert_eq!(image.to_bytes(), vec![28, 29, 34, 0, 0, 1, 0]);
    }

    #[test]
    fn test_rejects_bad_images() {
        assert_eq!(Image::from_bytes(&[0, 0, 0]), Err(Fault::BadImage));
        assert_eq!(Image::from_bytes(&[0, 0, 0, 0]), Err(Fault::BadImage));
        assert_eq!(Image::from_bytes(&[34, 0, 0, 5, 0]), Err(Fault::BadImage));
    }
}
