use crate::error::{MrseqError, Result};
use crate::extraction::tags::{
    get_float_value, get_multi_float_value, get_u16_value, COLUMNS, IMAGE_ORIENTATION_PATIENT,
    IMAGE_POSITION_PATIENT, PIXEL_SPACING, ROWS, SLICE_THICKNESS, SPACING_BETWEEN_SLICES,
};
use crate::scan::list_dicom_files;
use crate::volume::VolumeConverter;
use dicom_object::{open_file, FileDicomObject, InMemDicomObject};
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder};
use log::{debug, warn};
use ndarray::Array3;
use ::nifti::writer::WriterOptions;
use ::nifti::NiftiHeader;
use std::path::Path;

/// NIFTI_XFORM_SCANNER_ANAT
const XFORM_SCANNER_ANAT: i16 = 1;
/// NIFTI_UNITS_MM
const UNITS_MM: u8 = 2;

type Vec3 = [f64; 3];

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Patient geometry of one slice
#[derive(Debug, Clone, Copy, PartialEq)]
struct SliceGeometry {
    row_dir: Vec3,
    col_dir: Vec3,
    position: Vec3,
}

impl SliceGeometry {
    fn read(dcm: &InMemDicomObject) -> Option<Self> {
        let orientation = get_multi_float_value(dcm, IMAGE_ORIENTATION_PATIENT)?;
        let position = get_multi_float_value(dcm, IMAGE_POSITION_PATIENT)?;
        if orientation.len() != 6 || position.len() != 3 {
            return None;
        }
        Some(Self {
            row_dir: [orientation[0], orientation[1], orientation[2]],
            col_dir: [orientation[3], orientation[4], orientation[5]],
            position: [position[0], position[1], position[2]],
        })
    }

    fn normal(&self) -> Vec3 {
        cross(self.row_dir, self.col_dir)
    }
}

struct LoadedSlice {
    obj: FileDicomObject<InMemDicomObject>,
    geometry: SliceGeometry,
    distance: f64,
}

/// Native DICOM series to NIfTI-1 converter
///
/// Slices are ordered along the slice normal, pixel values go through the modality LUT
/// (rescale slope and intercept) and the output carries a RAS scanner-space sform built
/// from the DICOM patient geometry. The voxel array is indexed `[column, row, slice]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NiftiConverter;

impl NiftiConverter {
    pub fn new() -> Self {
        NiftiConverter
    }

    fn load_slices(source_dir: &Path) -> Result<Vec<LoadedSlice>> {
        let files = list_dicom_files(source_dir)?;
        if files.is_empty() {
            return Err(MrseqError::NoDicomFiles(source_dir.display().to_string()));
        }

        let mut slices = Vec::with_capacity(files.len());
        for path in &files {
            let obj = open_file(path)?;
            let geometry = SliceGeometry::read(&obj).ok_or_else(|| {
                MrseqError::Conversion(format!(
                    "{} has no usable patient orientation or position",
                    path.display()
                ))
            })?;
            slices.push(LoadedSlice {
                obj,
                geometry,
                distance: 0.0,
            });
        }

        let normal = slices[0].geometry.normal();
        for slice in &mut slices {
            slice.distance = dot(slice.geometry.position, normal);
        }
        slices.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        Ok(slices)
    }

    /// Step between consecutive slices, in patient coordinates
    fn slice_step(slices: &[LoadedSlice]) -> Vec3 {
        let first = &slices[0];
        if slices.len() > 1 {
            let last = &slices[slices.len() - 1];
            let n = (slices.len() - 1) as f64;
            return [
                (last.geometry.position[0] - first.geometry.position[0]) / n,
                (last.geometry.position[1] - first.geometry.position[1]) / n,
                (last.geometry.position[2] - first.geometry.position[2]) / n,
            ];
        }

        let spacing = get_float_value(&first.obj, SPACING_BETWEEN_SLICES)
            .or_else(|| get_float_value(&first.obj, SLICE_THICKNESS))
            .unwrap_or(1.0);
        let normal = first.geometry.normal();
        [normal[0] * spacing, normal[1] * spacing, normal[2] * spacing]
    }

    fn build_header(slices: &[LoadedSlice], pixel_spacing: (f64, f64)) -> NiftiHeader {
        let (row_spacing, col_spacing) = pixel_spacing;
        let geometry = slices[0].geometry;
        let step = Self::slice_step(slices);
        let slice_spacing = dot(step, step).sqrt();

        // LPS columns for the voxel axes (column index, row index, slice index)
        let x_axis = geometry.row_dir.map(|v| v * col_spacing);
        let y_axis = geometry.col_dir.map(|v| v * row_spacing);
        let origin = geometry.position;

        // LPS to RAS flips the first two patient axes
        let row = |axis: usize, sign: f64| -> [f32; 4] {
            [
                (sign * x_axis[axis]) as f32,
                (sign * y_axis[axis]) as f32,
                (sign * step[axis]) as f32,
                (sign * origin[axis]) as f32,
            ]
        };

        NiftiHeader {
            pixdim: [
                1.0,
                col_spacing as f32,
                row_spacing as f32,
                slice_spacing as f32,
                1.0,
                1.0,
                1.0,
                1.0,
            ],
            xyzt_units: UNITS_MM,
            qform_code: 0,
            sform_code: XFORM_SCANNER_ANAT,
            srow_x: row(0, -1.0),
            srow_y: row(1, -1.0),
            srow_z: row(2, 1.0),
            ..NiftiHeader::default()
        }
    }
}

impl VolumeConverter for NiftiConverter {
    fn convert(&self, source_dir: &Path, destination: &Path) -> Result<()> {
        let slices = Self::load_slices(source_dir)?;
        let first = &slices[0].obj;

        let rows = get_u16_value(first, ROWS)
            .ok_or_else(|| MrseqError::Conversion("missing Rows".to_string()))?
            as usize;
        let cols = get_u16_value(first, COLUMNS)
            .ok_or_else(|| MrseqError::Conversion("missing Columns".to_string()))?
            as usize;
        let pixel_spacing = match get_multi_float_value(first, PIXEL_SPACING).as_deref() {
            Some([row_spacing, col_spacing, ..]) => (*row_spacing, *col_spacing),
            _ => {
                warn!(
                    "No Pixel Spacing in {}, assuming 1 mm",
                    source_dir.display()
                );
                (1.0, 1.0)
            }
        };

        let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::Default);
        let mut volume = Array3::<f32>::zeros((cols, rows, slices.len()));
        for (k, slice) in slices.iter().enumerate() {
            let pixels = slice
                .obj
                .decode_pixel_data()?
                .to_vec_with_options::<f32>(&options)?;
            if pixels.len() != rows * cols {
                return Err(MrseqError::Conversion(format!(
                    "slice {} has {} pixels, expected {}x{}",
                    k,
                    pixels.len(),
                    rows,
                    cols
                )));
            }
            for r in 0..rows {
                for c in 0..cols {
                    volume[[c, r, k]] = pixels[r * cols + c];
                }
            }
        }

        let header = Self::build_header(&slices, pixel_spacing);
        debug!(
            "Writing {}x{}x{} volume to {}",
            cols,
            rows,
            slices.len(),
            destination.display()
        );
        WriterOptions::new(destination)
            .reference_header(&header)
            .write_nifti(&volume)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_of_axial_is_foot_to_head() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_geometry_requires_six_orientation_values() {
        use dicom_core::{DataElement, PrimitiveValue, VR};

        let mut dcm = InMemDicomObject::new_empty();
        dcm.put(DataElement::new(
            IMAGE_ORIENTATION_PATIENT,
            VR::DS,
            PrimitiveValue::Strs(["1", "0", "0"].iter().map(|s| s.to_string()).collect()),
        ));
        dcm.put(DataElement::new(
            IMAGE_POSITION_PATIENT,
            VR::DS,
            PrimitiveValue::Strs(["0", "0", "0"].iter().map(|s| s.to_string()).collect()),
        ));
        assert!(SliceGeometry::read(&dcm).is_none());
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = NiftiConverter::new().convert(dir.path(), &dir.path().join("out.nii"));
        assert!(matches!(result, Err(MrseqError::NoDicomFiles(_))));
    }
}
