use darling::FromDeriveInput;
use darling::FromField;
use proc_macro2::Ident;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::DeriveInput;
use syn::Generics;
use syn::Path;
use syn::Type;

#[derive(Debug, FromField)]
#[darling(attributes(tursodao))]
struct FieldReceiver {
    pub ident: Option<Ident>,
    pub ty:    Type,

    #[darling(default)]
    pub id: bool,

    #[darling(default)]
    pub primary_key: bool,

    #[darling(default)]
    pub column_name: Option<String>,

    #[darling(default)]
    pub transient: bool,

    #[darling(default)]
    pub immutable: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(tursodao), supports(struct_named))]
struct EntityReceiver {
    pub ident:    Ident,
    pub generics: Generics,
    pub data:     darling::ast::Data<(), FieldReceiver>,

    #[darling(default)]
    pub table_name: Option<String>,

    #[darling(default)]
    pub table_options: Option<String>,

    #[darling(default)]
    pub case_sensitive: bool,

    #[darling(default)]
    pub insert_sql: Option<String>,

    #[darling(default)]
    pub update_sql: Option<String>,

    #[darling(default)]
    pub create_table_sql: Option<String>,

    #[darling(default)]
    pub row_mapper: Option<Path>,

    #[darling(default)]
    pub constructor: Option<Path>,
}

#[derive(Debug)]
struct FieldInfo {
    pub field_name:   Ident,
    pub field_type:   Type,
    pub column_name:  Option<String>,
    pub is_id:        bool,
    pub is_transient: bool,
    pub is_immutable: bool,
}

#[derive(Debug)]
struct EntityInfo {
    pub struct_name:      Ident,
    pub generics:         Generics,
    pub table_name:       Option<String>,
    pub table_options:    Option<String>,
    pub case_sensitive:   bool,
    pub insert_sql:       Option<String>,
    pub update_sql:       Option<String>,
    pub create_table_sql: Option<String>,
    pub row_mapper:       Option<Path>,
    pub constructor:      Option<Path>,
    pub fields:           Vec<FieldInfo>,
}

impl FieldReceiver {
    pub fn to_field_info(self) -> darling::Result<FieldInfo> {
        let field_name = self.ident.ok_or_else(|| darling::Error::custom("Expected named field"))?;

        Ok(FieldInfo {
            field_name,
            field_type: self.ty,
            column_name: self.column_name,
            is_id: self.id || self.primary_key,
            is_transient: self.transient,
            is_immutable: self.immutable,
        })
    }
}

impl EntityReceiver {
    pub fn to_entity_info(self) -> darling::Result<EntityInfo> {
        let fields = self
            .data
            .take_struct()
            .ok_or_else(|| darling::Error::unsupported_shape("Expected struct with named fields"))?
            .fields
            .into_iter()
            .map(|f| f.to_field_info())
            .collect::<darling::Result<Vec<_>>>()?;

        Ok(EntityInfo {
            struct_name: self.ident,
            generics: self.generics,
            table_name: self.table_name,
            table_options: self.table_options,
            case_sensitive: self.case_sensitive,
            insert_sql: self.insert_sql,
            update_sql: self.update_sql,
            create_table_sql: self.create_table_sql,
            row_mapper: self.row_mapper,
            constructor: self.constructor,
            fields,
        })
    }
}

/// Derives `tursodao::Entity`
///
/// Identifier-count and accessor problems are reported by the runtime
/// resolver, so one consistent error path covers derived and hand-written
/// descriptors.
#[proc_macro_derive(Entity, attributes(tursodao))]
pub fn derive_entity(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    let receiver = match EntityReceiver::from_derive_input(&input) {
        Ok(r) => r,
        Err(e) => return e.write_errors().into(),
    };

    let entity_info = match receiver.to_entity_info() {
        Ok(info) => info,
        Err(e) => return e.write_errors().into(),
    };

    let expanded = impl_entity(&entity_info);
    proc_macro::TokenStream::from(expanded)
}

fn optional_call(method: &str, value: &Option<String>) -> TokenStream2 {
    let method = Ident::new(method, proc_macro2::Span::call_site());
    match value {
        Some(value) => quote! { .#method(#value) },
        None => quote! {},
    }
}

fn impl_entity(entity_info: &EntityInfo) -> TokenStream2 {
    let name = &entity_info.struct_name;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = entity_info.generics.split_for_impl();

    let table_name = optional_call("table_name", &entity_info.table_name);
    let table_options = optional_call("table_options", &entity_info.table_options);
    let insert_sql = optional_call("insert_sql", &entity_info.insert_sql);
    let update_sql = optional_call("update_sql", &entity_info.update_sql);
    let create_table_sql = optional_call("create_table_sql", &entity_info.create_table_sql);
    let case_sensitive = entity_info.case_sensitive;

    let attributes: Vec<_> = entity_info
        .fields
        .iter()
        .map(|f| {
            let field_str = f.field_name.to_string();
            let field_type = &f.field_type;
            let id = if f.is_id { quote! { .id() } } else { quote! {} };
            let transient = if f.is_transient { quote! { .transient() } } else { quote! {} };
            let immutable = if f.is_immutable { quote! { .immutable() } } else { quote! {} };
            let column = optional_call("column_name", &f.column_name);
            quote! {
                .attribute(
                    tursodao::AttrDescriptor::new(#field_str, <#field_type as tursodao::AttrType>::KIND)
                        #id #column #transient #immutable
                )
            }
        })
        .collect();

    // Excluded fields are described but get no accessors
    let accessors: Vec<_> = entity_info
        .fields
        .iter()
        .filter(|f| !f.is_transient && !f.is_immutable)
        .map(|f| {
            let field_name = &f.field_name;
            let field_str = field_name.to_string();
            let field_type = &f.field_type;
            quote! {
                .accessors(
                    #field_str,
                    <#field_type as tursodao::AttrType>::KIND,
                    |entity: &Self| tursodao::AttrType::into_attr(::std::clone::Clone::clone(&entity.#field_name)),
                    |entity: &mut Self, value: tursodao::AttrValue| {
                        entity.#field_name = <#field_type as tursodao::AttrType>::from_attr(value)?;
                        ::std::result::Result::Ok(())
                    },
                )
            }
        })
        .collect();

    let row_mapper = match &entity_info.row_mapper {
        Some(path) => {
            let method_name = path.segments.last().map(|s| s.ident.to_string()).unwrap_or_default();
            quote! { .row_mapper(#method_name, #path) }
        }
        None => quote! {},
    };

    let constructor = match (&entity_info.constructor, &entity_info.row_mapper) {
        (Some(path), _) => quote! { .constructor(#path) },
        (None, Some(_)) => quote! {},
        (None, None) => quote! { .constructor(<Self as ::std::default::Default>::default) },
    };

    quote! {
        impl #impl_generics tursodao::Entity for #name #ty_generics #where_clause {
            fn descriptor() -> tursodao::EntityDescriptor<Self> {
                tursodao::EntityDescriptor::<Self>::new(#type_name)
                    #table_name
                    #table_options
                    .case_sensitive(#case_sensitive)
                    #insert_sql
                    #update_sql
                    #create_table_sql
                    #(#attributes)*
                    #(#accessors)*
                    #row_mapper
                    #constructor
            }
        }
    }
}
