//! Pixel tensors.
//!
//! A pixel tensor is a float32 [`NumericArray`] of shape `[height, width]`
//! for one channel or `[height, width, channels]` for several. Each channel
//! is one contiguous row-major plane.

use crate::error::{FrameError, FrameResult};
use crate::window::DataWindow;
use vfx_value::{ElementType, NumericArray};

/// Wraps `channels` consecutive planes covering `window` as a tensor.
pub fn from_planes(window: &DataWindow, channels: usize, planes: Vec<f32>) -> FrameResult<NumericArray> {
    let tensor = if channels == 1 {
        NumericArray::from_vec(&[window.height, window.width], planes)?
    } else {
        NumericArray::from_vec(&[window.height, window.width, channels], planes)?
    };
    Ok(tensor)
}

/// Validates a tensor against `window` and returns its channel planes.
///
/// Rank 2 holds exactly one channel; rank 3 holds `shape[2]` channels,
/// which must equal `channels`.
pub fn planes<'t>(
    tensor: &'t NumericArray,
    window: &DataWindow,
    channels: usize,
) -> FrameResult<Vec<&'t [f32]>> {
    if tensor.element_type() != ElementType::Float32 {
        return Err(FrameError::ElementTypeMismatch {
            found: tensor.element_type(),
        });
    }
    let shape = tensor.shape();
    let fits = match *shape {
        [h, w] => h == window.height && w == window.width && channels == 1,
        [h, w, c] => h == window.height && w == window.width && c == channels,
        _ => false,
    };
    if !fits {
        let expected = if channels == 1 {
            format!("[{}, {}]", window.height, window.width)
        } else {
            format!("[{}, {}, {}]", window.height, window.width, channels)
        };
        return Err(FrameError::ShapeMismatch {
            expected,
            actual: shape.to_vec(),
        });
    }
    (0..channels)
        .map(|c| {
            tensor.slab::<f32>(c).ok_or_else(|| FrameError::ShapeMismatch {
                expected: format!("{channels} channel planes"),
                actual: shape.to_vec(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_is_rank_two() {
        let window = DataWindow::new(4, 3);
        let tensor = from_planes(&window, 1, vec![0.0; 12]).unwrap();
        assert_eq!(tensor.shape(), &[3, 4]);
        let tensor = from_planes(&window, 3, vec![0.0; 36]).unwrap();
        assert_eq!(tensor.shape(), &[3, 4, 3]);
    }

    #[test]
    fn planes_are_validated() {
        let window = DataWindow::new(2, 2);
        let rgb = NumericArray::from_vec(&[2, 2, 3], (0..12).map(|v| v as f32).collect()).unwrap();
        let split = planes(&rgb, &window, 3).unwrap();
        assert_eq!(split[1], &[4.0, 5.0, 6.0, 7.0]);

        assert!(matches!(
            planes(&rgb, &window, 2),
            Err(FrameError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            planes(&rgb, &DataWindow::new(2, 3), 3),
            Err(FrameError::ShapeMismatch { .. })
        ));

        let ints = NumericArray::from_vec(&[2, 2], vec![0i32; 4]).unwrap();
        assert!(matches!(
            planes(&ints, &window, 1),
            Err(FrameError::ElementTypeMismatch { found: ElementType::Int32 })
        ));

        let single = NumericArray::from_vec(&[2, 2, 1], vec![0.0f32; 4]).unwrap();
        assert_eq!(planes(&single, &window, 1).unwrap().len(), 1);
    }
}
