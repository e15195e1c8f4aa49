pub mod config;
pub mod engagement;
pub mod files;
pub mod manage;
pub mod queries;

pub use config::KataConfig;
pub use engagement::{JoinKataUseCase, RateKataUseCase};
pub use files::{DownloadFileUseCase, UploadFilesUseCase, UploadedFile};
pub use manage::{
    CreateKataInput, CreateKataUseCase, DeleteKataUseCase, UpdateKataInput, UpdateKataUseCase,
};
pub use queries::{GetKataUseCase, ListKatasUseCase, UserKatas, UserKatasUseCase};
