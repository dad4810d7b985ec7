//! Wire layer: primitive decoding and matrix framing.
//!
//! Layout of the format (all values little-endian):
//! ```text
//!  int32    4 bytes, two's complement
//!  double   8 bytes, IEEE-754
//!  string   int32 byte length L, then L bytes of UTF-8
//!  matrix   int32 rows, int32 cols, then rows*cols doubles (row-major)
//! ```
//!
//! ```text
//!  impl Read
//!      │
//!      ▼
//!  ┌────────────┐
//!  │ ByteReader │  bytes, ints, doubles, strings
//!  └────────────┘
//!      │
//!      ▼
//!  ┌────────────┐
//!  │  framing   │  read_matrix / read_vector → Matrix, Vec<f64>
//!  └────────────┘
//! ```

pub mod matrix;
pub mod reader;

pub use matrix::Matrix;
pub use reader::ByteReader;
