use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::label_modal::{OpenModal, PreviewStatus};
use shared::endpoints;

#[derive(Properties, PartialEq)]
pub struct LabelModalDialogProps {
    pub modal: OpenModal,
    pub on_close: Callback<()>,
    pub on_upload: Callback<Option<web_sys::File>>,
}

/// Barcode label viewer/uploader for one tote.
#[function_component(LabelModalDialog)]
pub fn label_modal_dialog(props: &LabelModalDialogProps) -> Html {
    let modal = &props.modal;
    let selected = use_state(|| None::<web_sys::File>);

    let on_file_change = {
        let selected = selected.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            selected.set(input.files().and_then(|files| files.get(0)));
        })
    };

    let on_upload = {
        let selected = selected.clone();
        let on_upload = props.on_upload.clone();
        Callback::from(move |_: MouseEvent| on_upload.emit((*selected).clone()))
    };

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let preview = match modal.preview {
        PreviewStatus::Loading => html! {
            <div class="label-preview-loading">{ "Loading..." }</div>
        },
        PreviewStatus::Available => html! {
            <img
                class="label-preview"
                src={modal.preview_url.clone()}
                alt={format!("Label for {}", modal.tote_id)}
            />
        },
        PreviewStatus::Absent => html! {
            <div class="label-preview-missing">{ "No label uploaded yet" }</div>
        },
    };

    html! {
        <>
            <div class="modal-backdrop" onclick={on_close.clone()} />
            <div class="modal label-modal" role="dialog">
                <header class="modal-header">
                    <h3>{ format!("Barcode - {}", modal.tote_id) }</h3>
                    <button class="modal-close" onclick={on_close}>{ "×" }</button>
                </header>

                <div class="modal-body">
                    { preview }
                    if modal.preview == PreviewStatus::Available {
                        <a
                            class="label-download"
                            href={endpoints::label_image_path(&modal.tote_id, None)}
                            download=""
                        >
                            { "Download" }
                        </a>
                    }

                    <input
                        type="file"
                        accept="image/*"
                        onchange={on_file_change}
                        disabled={modal.uploading}
                    />
                    <button class="upload-button" onclick={on_upload} disabled={modal.uploading}>
                        { if modal.uploading { "Uploading..." } else { "Upload" } }
                    </button>

                    if let Some(error) = &modal.error {
                        <div class="modal-error">{ error }</div>
                    }
                    if let Some(notice) = &modal.notice {
                        <div class="modal-notice">{ notice }</div>
                    }
                </div>
            </div>
        </>
    }
}
