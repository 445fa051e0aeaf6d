//! 本地文件读取
//!
//! 代码编辑器的"从文件导入"读文本，头像上传读字节。

use js_sys::Uint8Array;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

use super::http::FilePart;
use crate::error::{AppError, AppResult};

fn read_err(e: JsValue) -> AppError {
    AppError::Network(format!(
        "Не удалось прочитать файл: {}",
        e.as_string().unwrap_or_else(|| format!("{:?}", e))
    ))
}

/// 输入框当前选中的第一个文件
pub fn selected_file(input: &HtmlInputElement) -> Option<File> {
    input.files()?.get(0)
}

/// 以 UTF-8 文本读取
pub async fn read_text(file: &File) -> AppResult<String> {
    let text = JsFuture::from(file.text()).await.map_err(read_err)?;
    Ok(text.as_string().unwrap_or_default())
}

/// 读取为上传用的文件片段
pub async fn read_part(file: &File) -> AppResult<FilePart> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(read_err)?;
    Ok(FilePart {
        name: file.name(),
        mime: file.type_(),
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
