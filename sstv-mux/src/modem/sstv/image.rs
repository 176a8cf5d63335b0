use std::path::{
    Path,
    PathBuf,
};

use image::{
    DynamicImage,
    GrayImage,
    RgbImage,
};

use crate::modem::sstv::ProtocolConfig;

/// Color channel of a scanline, in transmission order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Read access to an 8-bit, row-major image.
pub trait FrameBuffer {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn channel_count(&self) -> usize;

    /// Returns the value of `channel` at `(x, y)`, or `None` outside of the
    /// image.
    fn sample(&self, x: usize, y: usize, channel: usize) -> Option<u8>;
}

impl<F> FrameBuffer for &F
where
    F: FrameBuffer,
{
    #[inline]
    fn width(&self) -> usize {
        (&**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (&**self).height()
    }

    #[inline]
    fn channel_count(&self) -> usize {
        (&**self).channel_count()
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> Option<u8> {
        (&**self).sample(x, y, channel)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("raster needs at least one channel")]
    NoChannels,
    #[error("raster data has {actual} bytes, expected {expected}")]
    DataLength { actual: usize, expected: usize },
}

/// Decoded image: interleaved channels, one byte per channel per pixel.
#[derive(Clone, derive_more::Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    channels: usize,
    #[debug(skip)]
    data: Vec<u8>,
}

impl Raster {
    pub fn new(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if channels == 0 {
            return Err(RasterError::NoChannels);
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(RasterError::DataLength {
                actual: data.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// # Panics
    ///
    /// Panics if `channels` is 0.
    pub fn from_fn(
        width: usize,
        height: usize,
        channels: usize,
        mut f: impl FnMut(usize, usize, usize) -> u8,
    ) -> Self {
        assert!(channels > 0, "raster needs at least one channel");
        let mut data = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for channel in 0..channels {
                    data.push(f(x, y, channel));
                }
            }
        }
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    pub fn filled(width: usize, height: usize, channels: usize, value: u8) -> Self {
        Self::from_fn(width, height, channels, |_, _, _| value)
    }

    /// Converts a decoded image, keeping its channel count. Images with more
    /// than 8 bits per channel are converted to 8 bits.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let channels = usize::from(image.color().channel_count());
        let (width, height) = (image.width() as usize, image.height() as usize);
        let data = match channels {
            1 => image.into_luma8().into_raw(),
            2 => image.into_luma_alpha8().into_raw(),
            3 => image.into_rgb8().into_raw(),
            _ => image.into_rgba8().into_raw(),
        };
        Self {
            width,
            height,
            channels: channels.clamp(1, 4),
            data,
        }
    }

    pub fn from_luma(image: GrayImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);
        Self {
            width,
            height,
            channels: 1,
            data: image.into_raw(),
        }
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl FrameBuffer for Raster {
    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn channel_count(&self) -> usize {
        self.channels
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> Option<u8> {
        if x < self.width && y < self.height && channel < self.channels {
            Some(self.data[(y * self.width + x) * self.channels + channel])
        }
        else {
            None
        }
    }
}

impl FrameBuffer for RgbImage {
    #[inline]
    fn width(&self) -> usize {
        RgbImage::width(self) as usize
    }

    #[inline]
    fn height(&self) -> usize {
        RgbImage::height(self) as usize
    }

    #[inline]
    fn channel_count(&self) -> usize {
        3
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> Option<u8> {
        let pixel = self.get_pixel_checked(x.try_into().ok()?, y.try_into().ok()?)?;
        pixel.0.get(channel).copied()
    }
}

impl FrameBuffer for GrayImage {
    #[inline]
    fn width(&self) -> usize {
        GrayImage::width(self) as usize
    }

    #[inline]
    fn height(&self) -> usize {
        GrayImage::height(self) as usize
    }

    #[inline]
    fn channel_count(&self) -> usize {
        1
    }

    #[inline]
    fn sample(&self, x: usize, y: usize, channel: usize) -> Option<u8> {
        let pixel = self.get_pixel_checked(x.try_into().ok()?, y.try_into().ok()?)?;
        pixel.0.get(channel).copied()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("could not load image: {}", .path.display())]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}

fn open(path: &Path) -> Result<DynamicImage, LoadError> {
    image::open(path).map_err(|source| {
        tracing::error!(path = %path.display(), %source, "could not load image");
        LoadError {
            path: path.to_owned(),
            source,
        }
    })
}

fn check_dimensions(path: &Path, raster: &Raster, expected_width: usize, expected_height: usize) {
    if raster.width() != expected_width || raster.height() != expected_height {
        tracing::warn!(
            path = %path.display(),
            width = raster.width(),
            height = raster.height(),
            expected_width,
            expected_height,
            "image dimensions differ from expected"
        );
    }
}

/// Loads the cover image with its native channel count.
pub fn load_cover(path: impl AsRef<Path>, config: &ProtocolConfig) -> Result<Raster, LoadError> {
    let path = path.as_ref();
    let raster = Raster::from_dynamic(open(path)?);
    tracing::debug!(path = %path.display(), ?raster, "loaded cover image");
    check_dimensions(path, &raster, config.cover_width, config.cover_height);
    Ok(raster)
}

/// Loads the flag image as grayscale.
pub fn load_flag(path: impl AsRef<Path>, config: &ProtocolConfig) -> Result<Raster, LoadError> {
    let path = path.as_ref();
    let raster = Raster::from_luma(open(path)?.into_luma8());
    tracing::debug!(path = %path.display(), ?raster, "loaded flag image");
    check_dimensions(path, &raster, config.flag_width, config.flag_height);
    Ok(raster)
}
